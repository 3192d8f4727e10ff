//! Terminal presentation of the tracker

pub mod analysis;
pub mod business;
pub mod cards;
pub mod dashboard;
pub mod goal;
pub mod loans;
pub mod setup;
pub mod ui;
