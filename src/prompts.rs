//! Fixed prompt texts sent to the completion service.

use crate::completion::ChatMessage;
use std::path::PathBuf;

pub const COLLECTION_SYSTEM_PROMPT: &str = concat!(
    "You are an Postman Collection expert AI.\n",
    "You are given a code snippet and asked to generate a Postman collection for the API ",
    "implemented by this code.\n",
    "You will respond with a Postman collection in JSON format.\n",
    "You will respond only with the JSON, not with any other text.\n",
    "You will NOT respond with Markdown.\n",
    "You will respond with pure, raw JSON.",
);

pub const COLLECTION_REQUEST: &str = concat!(
    "Given the above functions, please generate a Postman collection for the API ",
    "implemented by this code.",
);

const COLLECTION_CONTEXT_INTRO: &str =
    "Here are the functions relevant to the API I am trying to generate a Postman collection for:";

const FILE_RANKING_INSTRUCTIONS: &str = concat!(
    "Consider your knowledge of how REST APIs are commonly built using Python.\n",
    "Which of the following files are likely candidates for containing the code for an API ",
    "and its endpoints?\n",
    "Please respond with only the list of files.\n",
    "Do not respond with any acknowledgement or explanation.\n",
    "Please respond with the plain raw text of the list of files.\n",
    "Please order the files you respond with by their likelihood to have important API code ",
    "in them.",
);

/// Messages asking the service to rank `paths`, one path per line in the reply.
pub fn file_ranking_messages(paths: &[PathBuf]) -> Vec<ChatMessage> {
    let listing = paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join("\n");

    vec![ChatMessage::user(format!(
        "{}\n{}",
        FILE_RANKING_INSTRUCTIONS, listing
    ))]
}

/// Messages asking the service to turn `context` into a Postman collection.
pub fn collection_messages(context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(COLLECTION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "{}\n```python\n{}\n```",
            COLLECTION_CONTEXT_INTRO, context
        )),
        ChatMessage::user(COLLECTION_REQUEST),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;

    #[test]
    fn test_file_ranking_lists_one_path_per_line() {
        let messages = file_ranking_messages(&[
            PathBuf::from("app/main.py"),
            PathBuf::from("app/search.py"),
        ]);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.ends_with(
            "likelihood to have important API code in them.\napp/main.py\napp/search.py"
        ));
    }

    #[test]
    fn test_collection_messages_embed_context() {
        let messages = collection_messages("async def search(q: str):\n    return q");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("pure, raw JSON"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1]
            .content
            .contains("```python\nasync def search(q: str):\n    return q\n```"));
        assert_eq!(messages[2].content, COLLECTION_REQUEST);
    }
}
