//! Enveloped CRUD operations
//!
//! Thin wrappers over a collection that take filters and updates in JSON
//! form and report every outcome as an [`Envelope`]. Argument problems are
//! reported as input errors before any store round trip.

use serde_json::{Map, Value};

use crate::document::{into_document, Document};
use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};
use crate::query::{sort_documents, Criteria, FindQuery, SortSpec};
use crate::store::{Collection, CollectionWrite, Update};

/// Inserts documents, returning their identifiers
pub async fn insert<C>(collection: &C, documents: Vec<Value>) -> Envelope<Vec<Value>>
where
    C: CollectionWrite + ?Sized,
{
    let documents = match to_documents(documents) {
        Ok(docs) => docs,
        Err(e) => return Envelope::fail(e),
    };
    Envelope::wrap(collection.insert_many(documents)).await
}

/// Finds the first matching document in store order
pub async fn find_one<C>(collection: &C, filter: &Value) -> Envelope<Option<Document>>
where
    C: Collection + ?Sized,
{
    let criteria = match Criteria::from_value(filter) {
        Ok(c) => c,
        Err(e) => return Envelope::fail(e),
    };
    Envelope::wrap(collection.find_one(&criteria)).await
}

/// Updates the first matching document.
///
/// A missing filter or an empty update is an input error.
pub async fn find_one_and_update<C>(
    collection: &C,
    filter: Option<&Value>,
    update: &Value,
    return_new: bool,
) -> Envelope<Option<Document>>
where
    C: CollectionWrite + ?Sized,
{
    let prepared = filter
        .ok_or_else(|| StoreError::input("filter is required"))
        .and_then(|f| Ok((Criteria::from_value(f)?, Update::from_value(update)?)));

    let (criteria, update) = match prepared {
        Ok(p) => p,
        Err(e) => return Envelope::fail(e),
    };
    Envelope::wrap(collection.find_one_and_update(&criteria, &update, return_new)).await
}

/// Runs an aggregation pipeline given in JSON form
pub async fn aggregate<C>(collection: &C, pipeline: &Value) -> Envelope<Vec<Document>>
where
    C: Collection + ?Sized,
{
    match Stage::parse_pipeline(pipeline) {
        Ok(stages) => aggregate_stages(collection, stages).await,
        Err(e) => Envelope::fail(e),
    }
}

/// Runs parsed stages in order
pub async fn aggregate_stages<C>(collection: &C, stages: Vec<Stage>) -> Envelope<Vec<Document>>
where
    C: Collection + ?Sized,
{
    Envelope::wrap(run_pipeline(collection, stages)).await
}

fn to_documents(values: Vec<Value>) -> StoreResult<Vec<Document>> {
    if values.is_empty() {
        return Err(StoreError::input("nothing to insert"));
    }
    values
        .into_iter()
        .map(|v| {
            let shown = v.to_string();
            into_document(v)
                .ok_or_else(|| StoreError::input(format!("document must be an object: {}", shown)))
        })
        .collect()
}

/// One aggregation stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep matching documents
    Match(Criteria),
    /// Sort by keys
    Sort(SortSpec),
    /// Drop the first n documents
    Skip(u64),
    /// Keep at most n documents
    Limit(u64),
    /// Replace the stream with `{<name>: count}`; an empty stream stays empty
    Count(String),
}

impl Stage {
    /// Parses a JSON pipeline, e.g. `[{"$match": {..}}, {"$sort": {"a": -1}}]`
    pub fn parse_pipeline(pipeline: &Value) -> StoreResult<Vec<Self>> {
        let stages = pipeline
            .as_array()
            .ok_or_else(|| StoreError::input("pipeline must be an array"))?;
        stages.iter().map(Self::parse).collect()
    }

    /// Parses a single stage object
    pub fn parse(stage: &Value) -> StoreResult<Self> {
        let (op, arg) = match stage.as_object() {
            Some(map) if map.len() == 1 => map
                .iter()
                .next()
                .ok_or_else(|| StoreError::query_build("empty stage"))?,
            _ => {
                return Err(StoreError::query_build(format!(
                    "stage must have exactly one operator: {}",
                    stage
                )))
            }
        };

        match op.as_str() {
            "$match" => Ok(Self::Match(Criteria::from_value(arg)?)),
            "$sort" => {
                let keys = arg
                    .as_object()
                    .ok_or_else(|| StoreError::query_build("$sort requires an object"))?;
                let mut spec = SortSpec::default();
                for (field, direction) in keys {
                    let direction = match direction {
                        Value::String(s) => s.to_lowercase(),
                        other => other.to_string(),
                    };
                    spec.set(field.clone(), direction);
                }
                Ok(Self::Sort(spec))
            }
            "$skip" => Ok(Self::Skip(count_arg(op, arg)?)),
            "$limit" => Ok(Self::Limit(count_arg(op, arg)?)),
            "$count" => match arg.as_str() {
                Some(name) if !name.is_empty() => Ok(Self::Count(name.to_string())),
                _ => Err(StoreError::query_build("$count requires a field name")),
            },
            other => Err(StoreError::query_build(format!(
                "Unsupported stage: {}",
                other
            ))),
        }
    }
}

fn count_arg(op: &str, arg: &Value) -> StoreResult<u64> {
    arg.as_u64()
        .ok_or_else(|| StoreError::query_build(format!("{} requires a non-negative integer", op)))
}

async fn run_pipeline<C>(collection: &C, stages: Vec<Stage>) -> StoreResult<Vec<Document>>
where
    C: Collection + ?Sized,
{
    let mut docs = collection.find(&FindQuery::new(Criteria::new())).await?;

    for stage in stages {
        docs = match stage {
            Stage::Match(criteria) => docs.into_iter().filter(|d| criteria.matches(d)).collect(),
            Stage::Sort(spec) => {
                let keys = spec.resolve()?;
                sort_documents(&mut docs, &keys);
                docs
            }
            Stage::Skip(n) => docs
                .into_iter()
                .skip(usize::try_from(n).unwrap_or(usize::MAX))
                .collect(),
            Stage::Limit(n) => docs
                .into_iter()
                .take(usize::try_from(n).unwrap_or(usize::MAX))
                .collect(),
            Stage::Count(_) if docs.is_empty() => docs,
            Stage::Count(name) => {
                let mut out = Map::new();
                out.insert(name, Value::from(docs.len() as u64));
                vec![out]
            }
        };
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCollection;
    use serde_json::json;

    async fn people() -> MemoryCollection {
        let coll = MemoryCollection::new("people");
        let env = insert(
            &coll,
            vec![
                json!({"_id": 1, "name": "ann", "age": 31}),
                json!({"_id": 2, "name": "bob", "age": 17}),
                json!({"_id": 3, "name": "cid", "age": 45}),
            ],
        )
        .await;
        assert!(!env.has_error());
        coll
    }

    #[tokio::test]
    async fn test_insert_rejects_empty_and_non_objects() {
        let coll = MemoryCollection::new("x");

        let env = insert(&coll, Vec::new()).await;
        assert!(matches!(env.error(), Some(StoreError::Input(_))));

        let env = insert(&coll, vec![json!(5)]).await;
        assert!(matches!(env.error(), Some(StoreError::Input(_))));
        assert!(coll.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_one() {
        let coll = people().await;

        let env = find_one(&coll, &json!({"age": {"$gt": 40}})).await;
        assert_eq!(env.return_object().unwrap().as_ref().unwrap()["name"], json!("cid"));

        let env = find_one(&coll, &json!({"age": {"$bogus": 1}})).await;
        assert!(matches!(env.error(), Some(StoreError::QueryBuild(_))));
    }

    #[tokio::test]
    async fn test_find_one_and_update_requires_filter() {
        let coll = people().await;

        let env = find_one_and_update(&coll, None, &json!({"$set": {"age": 1}}), true).await;
        assert!(matches!(env.error(), Some(StoreError::Input(_))));

        let env = find_one_and_update(&coll, Some(&json!({"_id": 1})), &json!({}), true).await;
        assert!(matches!(env.error(), Some(StoreError::Input(_))));
    }

    #[tokio::test]
    async fn test_find_one_and_update_returns_new() {
        let coll = people().await;

        let env = find_one_and_update(
            &coll,
            Some(&json!({"name": "bob"})),
            &json!({"$inc": {"age": 1}}),
            true,
        )
        .await;

        let doc = env.into_result().unwrap().unwrap();
        assert_eq!(doc["age"], json!(18));
    }

    #[tokio::test]
    async fn test_aggregate() {
        let coll = people().await;

        let env = aggregate(
            &coll,
            &json!([
                {"$match": {"age": {"$gte": 18}}},
                {"$sort": {"age": -1}},
                {"$limit": 1}
            ]),
        )
        .await;
        let rows = env.into_result().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("cid"));

        let env = aggregate(&coll, &json!([{"$skip": 1}, {"$count": "total"}])).await;
        assert_eq!(env.into_result().unwrap()[0]["total"], json!(2));
    }

    #[tokio::test]
    async fn test_count_of_nothing_emits_no_document() {
        let coll = people().await;

        let env = aggregate(
            &coll,
            &json!([{"$match": {"age": {"$gt": 100}}}, {"$count": "total"}]),
        )
        .await;
        assert!(env.into_result().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_typed_stages() {
        let coll = people().await;

        let stages = vec![
            Stage::Sort(SortSpec::default().asc("name")),
            Stage::Skip(1),
            Stage::Limit(1),
        ];
        let rows = aggregate_stages(&coll, stages).await.into_result().unwrap();
        assert_eq!(rows[0]["name"], json!("bob"));
    }

    #[tokio::test]
    async fn test_aggregate_rejects_bad_stages() {
        let coll = people().await;

        let env = aggregate(&coll, &json!({"$match": {}})).await;
        assert!(matches!(env.error(), Some(StoreError::Input(_))));

        let env = aggregate(&coll, &json!([{"$group": {}}])).await;
        assert!(matches!(env.error(), Some(StoreError::QueryBuild(_))));

        let env = aggregate(&coll, &json!([{"$sort": {"age": "up"}}])).await;
        assert!(matches!(env.error(), Some(StoreError::QueryBuild(_))));

        let env = aggregate(&coll, &json!([{"$limit": -1}])).await;
        assert!(env.has_error());
    }
}
