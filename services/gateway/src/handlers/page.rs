use crate::error::AppError;
use crate::render::render_page;
use crate::state::AppState;
use axum::{extract::State, response::Html};

/// `GET /`: the retained records as a styled page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let now = state.clock.now_ms();
    let records = {
        let mut store = state.store()?;
        store.prune(now);
        store.list_descending()
    };

    Ok(Html(render_page(&records, state.extractor.variant())))
}
