use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoDraft;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoDraftRepository {
    collection: Collection<MongoDraft>,
}

impl MongoDraftRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("drafts");
        Self { collection }
    }

    pub async fn get_draft(&self, thread_id: &str) -> Result<Option<MongoDraft>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Insert or replace the draft of a thread
    pub async fn put_draft(&self, draft: &MongoDraft) -> Result<()> {
        let filter = doc! { "_id": draft.thread_id.as_str() };
        self.collection
            .replace_one(filter, draft)
            .upsert(true)
            .await?;
        Ok(())
    }
}
