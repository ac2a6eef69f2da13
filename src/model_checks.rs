use crate::error::ModelError;
use crate::llm_client::{ChatModel, ChatSession, truncate};
use crate::models::Part;

/// One-shot reachability probe for the configured model. An empty reply
/// still counts: the endpoint answered, the token cap just cut it short.
pub async fn perform_model_check(model: &dyn ChatModel) -> bool {
    println!("Checking model {}:", model.model_name());
    let mut session = ChatSession::default();
    match session.send_message(model, vec![Part::from("ping")]).await {
        Ok(_) | Err(ModelError::EmptyReply) => {
            println!("[OK] {}", model.model_name());
            true
        }
        Err(e) => {
            println!("[FAIL] {}\n  {}", model.model_name(), truncate(&e.to_string(), 500));
            false
        }
    }
}
