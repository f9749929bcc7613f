use async_trait::async_trait;
use draftline_core::{DraftState, Message, Thread};
use mongodb::{bson::doc, Client};

use crate::dbs::mongo::models::{MongoDraft, MongoMessage, MongoThread};
use crate::dbs::mongo::repositories::{
    MongoDraftRepository, MongoMessageRepository, MongoThreadRepository,
};
use crate::error::{PersistError, Result};
use crate::retention::HighlightRetention;
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    client: Client,
    database: String,
    thread_repo: MongoThreadRepository,
    message_repo: MongoMessageRepository,
    draft_repo: MongoDraftRepository,
    retention: HighlightRetention,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        tracing::info!(database, "MongoDB client connected");

        Ok(Self {
            thread_repo: MongoThreadRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
            draft_repo: MongoDraftRepository::new(&client, database),
            database: database.to_string(),
            client,
            retention: HighlightRetention::Keep,
        })
    }

    pub fn with_retention(mut self, retention: HighlightRetention) -> Self {
        self.retention = retention;
        self
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn create_thread(&self, thread: Thread, draft: DraftState) -> Result<()> {
        if self.thread_repo.get_thread(&thread.id).await?.is_some() {
            return Err(PersistError::ThreadExists(thread.id));
        }
        let draft: MongoDraft = self.retention.apply(draft).into();
        self.draft_repo.put_draft(&draft).await?;
        self.thread_repo.insert_thread(&thread.into()).await?;
        Ok(())
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let thread = self.thread_repo.get_thread(thread_id).await?;
        Ok(thread.map(Into::into))
    }

    async fn list_threads(&self, limit: Option<i64>, skip: Option<i64>) -> Result<Vec<Thread>> {
        let threads = self.thread_repo.list_threads(limit, skip).await?;
        Ok(threads.into_iter().map(Into::into).collect())
    }

    async fn save_message(&self, message: Message) -> Result<()> {
        let seq = self.message_repo.next_seq(&message.thread_id).await?;
        let message = MongoMessage::from_message(message, seq);
        self.message_repo.save_message(&message).await
    }

    async fn get_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        let messages = self.message_repo.get_messages(thread_id).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    async fn get_draft(&self, thread_id: &str) -> Result<Option<DraftState>> {
        let draft = self.draft_repo.get_draft(thread_id).await?;
        Ok(draft.map(Into::into))
    }

    async fn save_draft(&self, draft: DraftState) -> Result<()> {
        let draft: MongoDraft = self.retention.apply(draft).into();
        self.draft_repo.put_draft(&draft).await
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
