//! Persistence gateway: the handful of document requests ingestion issues
//!
//! Every call is independent. Nothing here is transactional, and repeated
//! writes simply overwrite (updates) or accumulate (creates).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use super::costs::{MonthlyCostSummary, ShoppingEntry, TeacherMealEntry};
use super::roster::{MealFeeRecord, StudentRecord};
use crate::api::{DocumentStore, Filter, GatewayError, Operation};
use crate::config::Collections;

const ROOM_NUMBER: &str = "room_number";
const STUDENT_EMAIL: &str = "email";

/// Stored shape of a monthly cost summary.
///
/// Entry lists are flattened to JSON text because the collection stores
/// them as plain strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostSummaryDocument {
    #[serde(rename = "accounted_month", deserialize_with = "string_or_null")]
    pub accounted_month: String,
    #[serde(deserialize_with = "number_or_null")]
    pub previous_stock: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub std_total_collection: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub teacher_collection: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub total_cost: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub total_meals_served: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub guest_taka: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub per_meal_cost: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub current_stock: f64,
    #[serde(deserialize_with = "number_or_null")]
    pub others: f64,
    #[serde(deserialize_with = "string_or_null")]
    pub shopping_data: String,
    #[serde(deserialize_with = "string_or_null")]
    pub teacher_meals_data: String,
}

impl CostSummaryDocument {
    /// Round every figure to cents and serialize the entry lists
    pub fn from_summary(summary: &MonthlyCostSummary) -> Result<Self, serde_json::Error> {
        Ok(Self {
            accounted_month: summary.accounted_month.clone(),
            previous_stock: round2(summary.previous_stock),
            std_total_collection: round2(summary.std_total_collection),
            teacher_collection: round2(summary.teacher_collection()),
            total_cost: round2(summary.total_cost),
            total_meals_served: round2(summary.total_meals_served),
            guest_taka: round2(summary.guest_taka),
            per_meal_cost: round2(summary.per_meal_cost),
            current_stock: round2(summary.current_stock),
            others: round2(summary.others),
            shopping_data: serde_json::to_string(&summary.shopping_entries)?,
            teacher_meals_data: serde_json::to_string(summary.teacher_meal_entries())?,
        })
    }

    /// Rebuild the structured summary. Missing or unreadable entry text
    /// decodes as an empty list.
    pub fn into_summary(self) -> MonthlyCostSummary {
        let mut summary = MonthlyCostSummary::new(self.accounted_month);
        summary.previous_stock = self.previous_stock;
        summary.std_total_collection = self.std_total_collection;
        summary.total_cost = self.total_cost;
        summary.total_meals_served = self.total_meals_served;
        summary.guest_taka = self.guest_taka;
        summary.per_meal_cost = self.per_meal_cost;
        summary.current_stock = self.current_stock;
        summary.others = self.others;
        summary.shopping_entries = decode_entries::<ShoppingEntry>(&self.shopping_data, "shoppingData");
        for entry in decode_entries::<TeacherMealEntry>(&self.teacher_meals_data, "teacherMealsData") {
            summary.push_teacher_meal(entry);
        }
        summary.with_stored_teacher_collection(self.teacher_collection)
    }
}

pub struct PersistenceGateway<'a> {
    store: &'a dyn DocumentStore,
    collections: &'a Collections,
}

impl<'a> PersistenceGateway<'a> {
    pub fn new(store: &'a dyn DocumentStore, collections: &'a Collections) -> Self {
        Self { store, collections }
    }

    /// Id of the first room document with this room number
    pub async fn find_room_document_id(&self, room_number: &str) -> Result<Option<String>, GatewayError> {
        let documents = self
            .store
            .list_documents(
                &self.collections.rooms,
                &[Filter::equal(ROOM_NUMBER, room_number)],
            )
            .await?;
        Ok(documents.into_iter().next().map(|doc| doc.id))
    }

    pub async fn reset_room_occupancy(&self, document_id: &str) -> Result<(), GatewayError> {
        self.update_room(document_id, 0, &[]).await
    }

    pub async fn write_room_occupancy(
        &self,
        document_id: &str,
        occupied_seats: usize,
        student_names: &[String],
    ) -> Result<(), GatewayError> {
        self.update_room(document_id, occupied_seats, student_names).await
    }

    async fn update_room(
        &self,
        document_id: &str,
        occupied_seats: usize,
        student_names: &[String],
    ) -> Result<(), GatewayError> {
        let data = json!({
            "occupied_seats": occupied_seats,
            "student_in_room": student_names,
        });
        self.store
            .execute(&Operation::update(&self.collections.rooms, document_id, data))
            .await?;
        Ok(())
    }

    /// Create a new summary document; earlier summaries are never touched
    pub async fn create_cost_summary_document(
        &self,
        summary: &MonthlyCostSummary,
    ) -> Result<String, GatewayError> {
        let document = CostSummaryDocument::from_summary(summary)?;
        self.create(&self.collections.management_costs, serde_json::to_value(&document)?)
            .await
    }

    /// Every stored cost summary, in store order
    pub async fn list_cost_summaries(&self) -> Result<Vec<MonthlyCostSummary>, GatewayError> {
        let documents = self
            .store
            .list_documents(&self.collections.management_costs, &[])
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value::<CostSummaryDocument>(Value::Object(doc.fields))
                    .map(CostSummaryDocument::into_summary)
                    .map_err(|e| GatewayError::InvalidResponse(format!("cost summary {}: {}", doc.id, e)))
            })
            .collect()
    }

    pub async fn find_student_by_email(&self, email: &str) -> Result<Option<String>, GatewayError> {
        let documents = self
            .store
            .list_documents(
                &self.collections.students,
                &[Filter::equal(STUDENT_EMAIL, email)],
            )
            .await?;
        Ok(documents.into_iter().next().map(|doc| doc.id))
    }

    pub async fn create_student_document(&self, student: &StudentRecord) -> Result<String, GatewayError> {
        self.create(&self.collections.students, serde_json::to_value(student)?)
            .await
    }

    pub async fn create_meal_fee_document(&self, fee: &MealFeeRecord) -> Result<String, GatewayError> {
        self.create(&self.collections.hostel_meal_fee, serde_json::to_value(fee)?)
            .await
    }

    async fn create(&self, collection: &str, data: Value) -> Result<String, GatewayError> {
        let result = self.store.execute(&Operation::create(collection, data)).await?;
        log::debug!("Created {} in {}", result.document_id, collection);
        Ok(result.document_id)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn decode_entries<T: DeserializeOwned>(text: &str, field: &str) -> Vec<T> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(text) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", field, e);
            Vec::new()
        }
    }
}

fn number_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
