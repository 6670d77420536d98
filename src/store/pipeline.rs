use bson::{Document, doc};

/// Builds an aggregation pipeline that finds values of `field`
/// shared by more than one document. Each result has the duplicated
/// value under `field` and the number of documents under `count`.
pub fn duplicates_pipeline(field: &str) -> Vec<Document> {
    let group_key = format!("${}", field);
    let mut project = doc! { "count": 1, "_id": 0 };
    project.insert(field, "$_id");

    vec![
        doc! {
            "$group": {
                "_id": group_key,
                "count": { "$sum": 1 },
            }
        },
        doc! {
            "$match": {
                "_id": { "$ne": null },
                "count": { "$gt": 1 },
            }
        },
        doc! { "$project": project },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_groups_by_the_field() {
        let pipeline = duplicates_pipeline("full_name");
        assert_eq!(pipeline.len(), 3);

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$full_name");
    }

    #[test]
    fn it_only_keeps_groups_with_more_than_one_document() {
        let pipeline = duplicates_pipeline("full_name");
        let matcher = pipeline[1].get_document("$match").unwrap();
        assert_eq!(matcher.get_document("count").unwrap(), &doc! { "$gt": 1 });
        assert_eq!(
            matcher.get_document("_id").unwrap(),
            &doc! { "$ne": bson::Bson::Null }
        );
    }

    #[test]
    fn it_projects_the_field_name() {
        let pipeline = duplicates_pipeline("email");
        let project = pipeline[2].get_document("$project").unwrap();
        assert_eq!(project.get_str("email").unwrap(), "$_id");
        assert_eq!(project.get_i32("_id").unwrap(), 0);
    }
}
