use mongodb::{
    Database, IndexModel,
    bson::doc,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // saved_searches: matching loads active searches on every event
    {
        let col = db.collection::<mongodb::bson::Document>("saved_searches");
        let model = IndexModel::builder()
            .keys(doc! { "is_active": 1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // alerts: history queries by user, newest first
    {
        let col = db.collection::<mongodb::bson::Document>("alerts");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "triggered_at": -1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
