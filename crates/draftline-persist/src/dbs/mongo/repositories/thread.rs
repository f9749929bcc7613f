use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoThread;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    pub async fn insert_thread(&self, thread: &MongoThread) -> Result<()> {
        self.collection.insert_one(thread).await?;
        Ok(())
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// List threads, newest first
    pub async fn list_threads(
        &self,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<MongoThread>> {
        let mut find_opts = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 });

        if let Some(limit) = limit {
            find_opts = find_opts.limit(limit);
        }
        if let Some(skip) = skip {
            find_opts = find_opts.skip(skip.try_into().unwrap_or(0));
        }

        let threads = find_opts.await?.try_collect().await?;
        Ok(threads)
    }
}
