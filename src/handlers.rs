pub mod dashboard;
pub mod deletes;
pub mod delivery;
pub mod materials;
pub mod packages;
pub mod received_items;
pub mod registry;
pub mod session;
pub mod staff;
pub mod sync;
pub mod time_records;
pub mod visitors;

#[cfg(test)]
pub mod test_support;
