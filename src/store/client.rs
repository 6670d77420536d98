use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions as DriverFindOptions, ServerAddress};
use mongodb::{Client, Collection};

use super::error::{Result, StoreError};
use super::models::{DeleteScope, Documents, FindOptions, InsertOutcome, MAX_DOCUMENT_SIZE};
use super::oplog::{FileLog, NoopLog, OpLog};

/// A MongoDB client scoped to a single database and collection.
///
/// Every operation targets the collection selected at construction;
/// there is no way to point an existing store somewhere else.
pub struct DocumentStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
    op_log: Arc<dyn OpLog>,
}

/// Builds driver options for a single host without touching the
/// network. The driver connects lazily on the first operation.
pub fn client_options(
    host: &str,
    port: u16,
    server_selection_timeout: Duration,
) -> ClientOptions {
    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::Tcp {
        host: host.to_string(),
        port: Some(port),
    }];
    options.server_selection_timeout = Some(server_selection_timeout);
    options.app_name = Some(String::from("woby"));
    options
}

impl DocumentStore {
    /// Connect to `host:port` and select `database.collection`. Sends a
    /// `ping` so an unreachable server fails here instead of on the
    /// first operation.
    pub async fn open(
        host: &str,
        port: u16,
        database: &str,
        collection: &str,
        log_path: Option<&Path>,
        server_selection_timeout: Duration,
    ) -> Result<Self> {
        let op_log: Arc<dyn OpLog> = match log_path {
            Some(path) => Arc::new(FileLog::open(path)?),
            None => Arc::new(NoopLog),
        };

        let options = client_options(host, port, server_selection_timeout);
        let client = Client::with_options(options)?;
        let store = Self::from_client(client, database, collection, op_log);

        store.op_log.record(
            "STARTING",
            &format!(
                "Connecting to DB on HOST:{}, PORT:{}, DB:{}, COLLECTION:{}...",
                host,
                port,
                database,
                collection
            ),
        );

        store
            .client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| StoreError::Connection {
                host: host.to_string(),
                port,
                source,
            })?;

        tracing::debug!("Connected to {}:{}/{}.{}", host, port, database, collection);

        Ok(store)
    }

    /// Build a store from an existing client. Does not perform any
    /// network I/O.
    pub fn from_client(
        client: Client,
        database: &str,
        collection: &str,
        op_log: Arc<dyn OpLog>,
    ) -> Self {
        let collection = client.database(database).collection::<Document>(collection);
        Self {
            client,
            database: database.to_string(),
            collection,
            op_log,
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Insert a single document or a batch. Returns the id of every
    /// inserted document in input order, generated by the driver when
    /// the document has no `_id`.
    ///
    /// Batches are not transactional: if an insert fails partway,
    /// documents before the failure remain in the collection.
    pub async fn insert_documents(
        &self,
        documents: impl Into<Documents>,
    ) -> Result<InsertOutcome> {
        let documents = documents.into();
        self.op_log.record(
            "INSERT",
            &format!(
                "Inserting payload to DB:{}, COLLECTION:{}...",
                self.database,
                self.collection_name()
            ),
        );

        let inserted_ids = match documents {
            Documents::One(doc) => {
                let result = self.collection.insert_one(doc).await?;
                vec![result.inserted_id]
            }
            Documents::Many(docs) => {
                let result = self.collection.insert_many(docs).await?;
                let mut ids: Vec<_> = result.inserted_ids.into_iter().collect();
                ids.sort_by_key(|(idx, _)| *idx);
                ids.into_iter().map(|(_, id)| id).collect()
            }
        };

        self.op_log.record("INSERT", "Insertion complete...");

        Ok(InsertOutcome { inserted_ids })
    }

    /// Find documents matching `query`. Results come back in the order
    /// the server returns them, which follows `opts.sort` when given.
    pub async fn get_documents(
        &self,
        query: Document,
        opts: FindOptions,
    ) -> Result<Vec<Document>> {
        let mut find_options = DriverFindOptions::default();
        find_options.limit = Some(opts.effective_limit());
        if !opts.projection.is_empty() {
            find_options.projection = Some(opts.projection.clone());
        }
        if !opts.sort.is_empty() {
            find_options.sort = Some(opts.sort_document());
        }

        let mut cursor = self
            .collection
            .find(query)
            .with_options(find_options)
            .await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            if opts.echo {
                tracing::info!("{}", document);
            }
            if opts.report_size {
                tracing::info!("Bytes: {}", self.document_size(&document)?);
            }
            documents.push(document);
        }

        Ok(documents)
    }

    /// Count the documents matching `query`.
    pub async fn count_documents(&self, query: Document) -> Result<u64> {
        Ok(self.collection.count_documents(query).await?)
    }

    /// Delete documents and return how many were removed.
    ///
    /// `DeleteScope::Many` refuses an empty query so a missing filter
    /// can't wipe the collection; use `DeleteScope::All` for that.
    pub async fn delete_documents(&self, query: Document, scope: DeleteScope) -> Result<u64> {
        if scope == DeleteScope::Many && query.is_empty() {
            return Err(StoreError::EmptyDeleteQuery);
        }

        self.op_log.record(
            "DELETE",
            &format!(
                "Deleting query {} from DB:{}, COLLECTION:{}...",
                query,
                self.database,
                self.collection_name()
            ),
        );

        let result = match scope {
            DeleteScope::All => self.collection.delete_many(Document::new()).await?,
            DeleteScope::Many => self.collection.delete_many(query).await?,
            DeleteScope::One => self.collection.delete_one(query).await?,
        };

        self.op_log.record("DELETE", "Completed deletion...");

        Ok(result.deleted_count)
    }

    /// Size in bytes of `doc` encoded as BSON.
    pub fn document_size(&self, doc: &Document) -> Result<usize> {
        document_size(doc)
    }

    /// Run an aggregation pipeline, typically one built with
    /// `duplicates_pipeline`, and return every result document.
    pub async fn find_duplicates(&self, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline).await?;
        let results: Vec<Document> = cursor.try_collect().await?;
        tracing::info!("Number of duplicates: {}", results.len());
        Ok(results)
    }
}

pub fn document_size(doc: &Document) -> Result<usize> {
    Ok(bson::to_vec(doc)?.len())
}

pub fn exceeds_max_size(doc: &Document) -> Result<bool> {
    Ok(document_size(doc)? > MAX_DOCUMENT_SIZE)
}
