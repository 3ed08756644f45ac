//! Domain definitions.

pub mod chat;
pub mod contract;
pub mod payment;
pub mod realty;
pub mod rent_detail;
pub mod user;

pub use self::{
    chat::Message, contract::Contract, payment::Payment, realty::Realty,
    rent_detail::RentDetail, user::User,
};
