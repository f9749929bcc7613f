use draftline_core::{Delta, DraftState, Highlight, HighlightKind, Message, Operation, Thread};
use draftline_persist::{HighlightRetention, InMemoryPersistenceClient, PersistError, PersistenceClient};

async fn client_with_thread(id: &str) -> InMemoryPersistenceClient {
    let client = InMemoryPersistenceClient::new();
    client
        .create_thread(Thread::new(Some(id.to_string())), DraftState::new(id))
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn test_create_thread_stores_initial_draft() {
    let client = client_with_thread("t1").await;

    let draft = client.get_draft("t1").await.unwrap().unwrap();
    assert_eq!(draft.revision, 0);
    assert_eq!(draft.doc["summary"], "");
    assert!(client.get_messages("t1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_thread_is_rejected() {
    let client = client_with_thread("t1").await;

    let err = client
        .create_thread(Thread::new(Some("t1".to_string())), DraftState::new("t1"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::ThreadExists(id) if id == "t1"));
}

#[tokio::test]
async fn test_messages_keep_append_order() {
    let client = client_with_thread("t1").await;

    for text in ["first", "second", "third"] {
        client.save_message(Message::new("t1", "ana", text)).await.unwrap();
    }

    let texts: Vec<String> = client
        .get_messages("t1")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_message_for_unknown_thread_fails() {
    let client = InMemoryPersistenceClient::new();
    let err = client
        .save_message(Message::new("ghost", "ana", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::ThreadNotFound(_)));
}

#[tokio::test]
async fn test_unknown_thread_reads_are_empty() {
    let client = InMemoryPersistenceClient::new();
    assert!(client.get_thread("ghost").await.unwrap().is_none());
    assert!(client.get_draft("ghost").await.unwrap().is_none());
    assert!(client.get_messages("ghost").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_draft_replaces_previous() {
    let client = client_with_thread("t1").await;
    let mut draft = client.get_draft("t1").await.unwrap().unwrap();
    draft
        .advance(Delta::new("t1", 1).with_op(Operation::set("/summary", "updated")))
        .unwrap();

    client.save_draft(draft).await.unwrap();

    let stored = client.get_draft("t1").await.unwrap().unwrap();
    assert_eq!(stored.revision, 1);
    assert_eq!(stored.doc["summary"], "updated");
    assert_eq!(stored.deltas.len(), 1);
}

#[tokio::test]
async fn test_strip_retention_drops_stored_highlights() {
    let client = InMemoryPersistenceClient::new().with_retention(HighlightRetention::Strip);
    client
        .create_thread(Thread::new(Some("t1".to_string())), DraftState::new("t1"))
        .await
        .unwrap();

    let mut draft = DraftState::new("t1");
    draft
        .advance(
            Delta::new("t1", 1)
                .with_op(Operation::set("/extracted/water/ph", 7.5))
                .with_highlight(Highlight::new(HighlightKind::NewParam, "Extracted pH: 7.5")),
        )
        .unwrap();
    client.save_draft(draft).await.unwrap();

    let stored = client.get_draft("t1").await.unwrap().unwrap();
    assert!(stored.deltas[0].highlights.is_empty());
    assert_eq!(stored.doc["extracted"]["water"]["ph"], 7.5);
}

#[tokio::test]
async fn test_list_threads_paginates_newest_first() {
    let client = InMemoryPersistenceClient::new();
    for id in ["a", "b", "c"] {
        client
            .create_thread(Thread::new(Some(id.to_string())), DraftState::new(id))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let all = client.list_threads(None, None).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);

    let page = client.list_threads(Some(1), Some(1)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "b");
}
