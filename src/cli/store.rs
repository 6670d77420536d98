use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use bson::{Bson, Document};
use clap::Subcommand;
use serde_json::{Value, json};

use crate::core::StoreConfig;
use crate::store::{
    DeleteScope, DocumentStore, Documents, FindOptions, SortDirection, document_size,
    duplicates_pipeline,
};

#[derive(Subcommand)]
pub enum StoreCommand {
    /// Insert a document or a JSON array of documents
    Insert {
        /// Read the payload from a JSON file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Inline JSON payload
        #[arg(long)]
        json: Option<String>,
    },
    /// Find documents matching a query
    Find {
        #[arg(long, default_value = "{}")]
        query: String,
        #[arg(long, default_value = "{}")]
        projection: String,
        /// Sort as `field:asc` or `field:desc`, can be repeated
        #[arg(long, value_parser = parse_sort)]
        sort: Vec<(String, SortDirection)>,
        #[arg(long, default_value = "1")]
        limit: u32,
        /// Log the BSON size of each document
        #[arg(long, action, default_value = "false")]
        size: bool,
        /// Log each document as it is retrieved
        #[arg(long, action, default_value = "false")]
        echo: bool,
    },
    /// Delete documents matching a query
    Delete {
        #[arg(long, default_value = "{}")]
        query: String,
        /// Delete every document matching the query
        #[arg(long, action, default_value = "false", conflicts_with = "all")]
        many: bool,
        /// Delete every document in the collection
        #[arg(long, action, default_value = "false")]
        all: bool,
    },
    /// Print the BSON size of a document in bytes
    Size {
        #[arg(long)]
        json: String,
    },
    /// Find values shared by more than one document
    Duplicates {
        /// Field to group by
        #[arg(long)]
        field: Option<String>,
        /// Custom aggregation pipeline as a JSON array
        #[arg(long)]
        pipeline: Option<String>,
    },
}

fn parse_sort(s: &str) -> Result<(String, SortDirection), String> {
    let (field, direction) = match s.split_once(':') {
        Some((field, direction)) => (field, direction.parse::<SortDirection>()?),
        None => (s, SortDirection::Ascending),
    };
    if field.is_empty() {
        return Err(format!("Missing sort field in \"{}\"", s));
    }
    Ok((field.to_string(), direction))
}

fn parse_document(s: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(s)?;
    if !value.is_object() {
        return Err(anyhow!("Expected a JSON object, got: {}", s));
    }
    Ok(bson::to_document(&value)?)
}

fn parse_pipeline(s: &str) -> Result<Vec<Document>> {
    let value: Value = serde_json::from_str(s)?;
    let stages = value
        .as_array()
        .ok_or(anyhow!("Expected a JSON array of stages, got: {}", s))?;
    stages
        .iter()
        .map(|stage| Ok(bson::to_document(stage)?))
        .collect()
}

fn to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}

async fn open_store(config: &StoreConfig) -> Result<DocumentStore> {
    let store = DocumentStore::open(
        &config.host,
        config.port,
        &config.database,
        &config.collection,
        config.log_path.as_deref(),
        config.server_selection_timeout,
    )
    .await?;
    Ok(store)
}

pub async fn run(command: StoreCommand, config: StoreConfig) -> Result<()> {
    tracing::debug!(
        "Using collection {}.{} on {}:{}",
        config.database,
        config.collection,
        config.host,
        config.port
    );

    match command {
        StoreCommand::Insert { file, json } => {
            let payload = match (file, json) {
                (Some(path), None) => fs::read_to_string(path)?,
                (None, Some(json)) => json,
                _ => return Err(anyhow!("Provide exactly one of \"--file\" or \"--json\"")),
            };
            let documents = Documents::try_from(serde_json::from_str::<Value>(&payload)?)?;
            let store = open_store(&config).await?;
            let outcome = store.insert_documents(documents).await?;
            let ids: Vec<Value> = outcome
                .inserted_ids
                .into_iter()
                .map(Bson::into_relaxed_extjson)
                .collect();
            println!("{}", json!({ "inserted_ids": ids }));
        }
        StoreCommand::Find {
            query,
            projection,
            sort,
            limit,
            size,
            echo,
        } => {
            let query = parse_document(&query)?;
            let opts = FindOptions {
                projection: parse_document(&projection)?,
                sort,
                limit,
                report_size: size,
                echo,
            };
            let store = open_store(&config).await?;
            let documents = store.get_documents(query, opts).await?;
            let results: Vec<Value> = documents.into_iter().map(to_json).collect();
            println!("{}", json!({ "results": results }));
        }
        StoreCommand::Delete { query, many, all } => {
            let scope = if all {
                DeleteScope::All
            } else if many {
                DeleteScope::Many
            } else {
                DeleteScope::One
            };
            let query = parse_document(&query)?;
            let store = open_store(&config).await?;
            let deleted_count = store.delete_documents(query, scope).await?;
            println!("{}", json!({ "deleted_count": deleted_count }));
        }
        StoreCommand::Size { json } => {
            let doc = parse_document(&json)?;
            println!("{}", json!({ "bytes": document_size(&doc)? }));
        }
        StoreCommand::Duplicates { field, pipeline } => {
            let pipeline = match (field, pipeline) {
                (Some(field), None) => duplicates_pipeline(&field),
                (None, Some(pipeline)) => parse_pipeline(&pipeline)?,
                _ => {
                    return Err(anyhow!(
                        "Provide exactly one of \"--field\" or \"--pipeline\""
                    ));
                }
            };
            let store = open_store(&config).await?;
            let results: Vec<Value> = store
                .find_duplicates(pipeline)
                .await?
                .into_iter()
                .map(to_json)
                .collect();
            println!("{}", json!({ "count": results.len(), "results": results }));
        }
    }

    Ok(())
}
