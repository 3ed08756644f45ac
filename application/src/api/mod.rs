//! GraphQL API definitions.

pub mod chat;
pub mod contract;
mod mutation;
pub mod payment;
pub mod plan;
mod query;
pub mod realty;
pub mod rent_detail;
pub mod scalar;
mod subscription;
pub mod user;

use crate::define_error;

pub use self::{
    chat::{Conversation, Message},
    contract::Contract,
    mutation::Mutation,
    payment::Payment,
    query::Query,
    realty::Realty,
    rent_detail::RentDetail,
    subscription::Subscription,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an owner"]
        Owner,

        #[code = "NOT_TENANT"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a tenant"]
        Tenant,
    }
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "`page` and `limit` must be positive numbers"]
        Invalid,
    }
}
