//! [`Command`] definition.

pub mod approve_contract;
pub mod authorize_user_session;
pub mod create_chat;
pub mod create_contract;
pub mod create_rent_detail;
pub mod mark_messages_read;
pub mod register_payment;
pub mod send_message;
pub mod terminate_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_contract::ApproveContract,
    authorize_user_session::AuthorizeUserSession, create_chat::CreateChat,
    create_contract::CreateContract, create_rent_detail::CreateRentDetail,
    mark_messages_read::MarkMessagesRead, register_payment::RegisterPayment,
    send_message::SendMessage, terminate_contract::TerminateContract,
};
