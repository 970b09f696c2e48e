// src/models/snapshot.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::Row,
    models::{
        collection::{decode_rows, Collection},
        company::Company,
        delivery::{DeliveryDriver, DeliveryVisit},
        employee::Employee,
        material::BorrowedMaterial,
        occurrence::Occurrence,
        package::Package,
        received_item::ReceivedItem,
        resident::Resident,
        time_record::TimeRecord,
        visitor::Visitor,
    },
};

/// Estado em memória das onze coleções.
///
/// Cada fatia é um `Arc` compartilhado: trocar uma fatia não toca nas outras,
/// e quem leu uma fotografia continua com ela mesmo após um novo commit.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub residents: Arc<Vec<Resident>>,
    pub packages: Arc<Vec<Package>>,
    pub companies: Arc<Vec<Company>>,
    pub employees: Arc<Vec<Employee>>,
    pub occurrences: Arc<Vec<Occurrence>>,
    pub received_items: Arc<Vec<ReceivedItem>>,
    pub materials: Arc<Vec<BorrowedMaterial>>,
    pub visitors: Arc<Vec<Visitor>>,
    pub time_records: Arc<Vec<TimeRecord>>,
    pub delivery_drivers: Arc<Vec<DeliveryDriver>>,
    pub delivery_visits: Arc<Vec<DeliveryVisit>>,
}

/// Uma fatia já traduzida, pronta para o commit.
#[derive(Debug)]
pub enum Slice {
    Residents(Vec<Resident>),
    Packages(Vec<Package>),
    Companies(Vec<Company>),
    Employees(Vec<Employee>),
    Occurrences(Vec<Occurrence>),
    ReceivedItems(Vec<ReceivedItem>),
    Materials(Vec<BorrowedMaterial>),
    Visitors(Vec<Visitor>),
    TimeRecords(Vec<TimeRecord>),
    DeliveryDrivers(Vec<DeliveryDriver>),
    DeliveryVisits(Vec<DeliveryVisit>),
}

impl Slice {
    /// Traduz as linhas cruas da coleção para o modelo de visão.
    pub fn decode(collection: Collection, rows: Vec<Row>) -> Result<Self, AppError> {
        Ok(match collection {
            Collection::Residents => Slice::Residents(decode_rows(rows)?),
            Collection::Packages => Slice::Packages(decode_rows(rows)?),
            Collection::Companies => Slice::Companies(decode_rows(rows)?),
            Collection::Employees => Slice::Employees(decode_rows(rows)?),
            Collection::Occurrences => Slice::Occurrences(decode_rows(rows)?),
            Collection::ReceivedItems => Slice::ReceivedItems(decode_rows(rows)?),
            Collection::Materials => Slice::Materials(decode_rows(rows)?),
            Collection::Visitors => Slice::Visitors(decode_rows(rows)?),
            Collection::TimeRecords => Slice::TimeRecords(decode_rows(rows)?),
            Collection::DeliveryDrivers => Slice::DeliveryDrivers(decode_rows(rows)?),
            Collection::DeliveryVisits => Slice::DeliveryVisits(decode_rows(rows)?),
        })
    }

    pub fn collection(&self) -> Collection {
        match self {
            Slice::Residents(_) => Collection::Residents,
            Slice::Packages(_) => Collection::Packages,
            Slice::Companies(_) => Collection::Companies,
            Slice::Employees(_) => Collection::Employees,
            Slice::Occurrences(_) => Collection::Occurrences,
            Slice::ReceivedItems(_) => Collection::ReceivedItems,
            Slice::Materials(_) => Collection::Materials,
            Slice::Visitors(_) => Collection::Visitors,
            Slice::TimeRecords(_) => Collection::TimeRecords,
            Slice::DeliveryDrivers(_) => Collection::DeliveryDrivers,
            Slice::DeliveryVisits(_) => Collection::DeliveryVisits,
        }
    }
}

impl Snapshot {
    /// Substitui apenas a fatia recebida.
    pub fn apply(&mut self, slice: Slice) {
        match slice {
            Slice::Residents(v) => self.residents = Arc::new(v),
            Slice::Packages(v) => self.packages = Arc::new(v),
            Slice::Companies(v) => self.companies = Arc::new(v),
            Slice::Employees(v) => self.employees = Arc::new(v),
            Slice::Occurrences(v) => self.occurrences = Arc::new(v),
            Slice::ReceivedItems(v) => self.received_items = Arc::new(v),
            Slice::Materials(v) => self.materials = Arc::new(v),
            Slice::Visitors(v) => self.visitors = Arc::new(v),
            Slice::TimeRecords(v) => self.time_records = Arc::new(v),
            Slice::DeliveryDrivers(v) => self.delivery_drivers = Arc::new(v),
            Slice::DeliveryVisits(v) => self.delivery_visits = Arc::new(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applying_a_slice_keeps_the_other_allocations() {
        let mut snapshot = Snapshot::default();
        let before = snapshot.clone();

        let rows = vec![json!({ "name": "Maria", "unit": "101" }).as_object().cloned().unwrap()];
        snapshot.apply(Slice::decode(Collection::Residents, rows).unwrap());

        assert_eq!(snapshot.residents.len(), 1);
        assert!(!Arc::ptr_eq(&snapshot.residents, &before.residents));
        assert!(Arc::ptr_eq(&snapshot.packages, &before.packages));
        assert!(Arc::ptr_eq(&snapshot.delivery_visits, &before.delivery_visits));
    }

    #[test]
    fn decode_failure_names_the_table() {
        let rows = vec![json!({ "id": "não-é-uuid" }).as_object().cloned().unwrap()];
        let err = Slice::decode(Collection::Visitors, rows).unwrap_err();
        assert!(matches!(err, AppError::RowDecode { collection: "visitors", .. }));
    }
}
