pub mod collection;
pub mod company;
pub mod dashboard;
pub mod delivery;
pub mod employee;
pub mod material;
pub mod occurrence;
pub mod package;
pub mod received_item;
pub mod resident;
pub mod session;
pub mod snapshot;
pub mod time_record;
pub mod visitor;
