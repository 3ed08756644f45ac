//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{
    api::{
        self, contract::ContractError, plan, realty::RealtyError,
        rent_detail::RentDetailError, user::UserError,
    },
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `RentDetail` tracking the rent of the specified `Realty`
    /// paid by the specified tenant.
    ///
    /// `endDate` defaults to one year after `startDate`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the authenticated `User` is not an owner;
    /// - `INVALID_PAYMENT_PLAN` - the `paymentPlan` is not recognized;
    /// - `INVALID_RENT` - `monthlyRent` is not positive;
    /// - `INVALID_PERIOD` - `startDate` is not before `endDate`;
    /// - `TENANT_NOT_EXISTS` - the specified tenant does not exist;
    /// - `REALTY_NOT_EXISTS` - the specified `Realty` does not exist or is
    ///                         not listed by the authenticated owner;
    /// - `RENT_DETAIL_EXISTS` - the `RentDetail` of the same parties upon the
    ///                          same `Realty` already exists;
    /// - `REALTY_OCCUPIED` - the `Realty` is rented by another tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = ?end_date,
            gql.name = "createRentDetail",
            monthly_rent = %monthly_rent,
            otel.name = Self::SPAN_NAME,
            payment_plan = %payment_plan,
            realty_id = %realty_id,
            start_date = %start_date,
            tenant_id = %tenant_id,
        ),
    )]
    pub async fn create_rent_detail(
        tenant_id: api::user::Id,
        realty_id: api::realty::Id,
        payment_plan: String,
        monthly_rent: Money,
        start_date: Date,
        end_date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::RentDetail, Error> {
        let payment_plan = plan::parse(&payment_plan).map_err(ctx.error())?;
        let my_id = ctx.owner_session().await?.user_id;

        ctx.service()
            .execute(command::CreateRentDetail {
                owner_id: my_id.into(),
                tenant_id: tenant_id.into(),
                realty_id: realty_id.into(),
                payment_plan,
                monthly_rent,
                start_date,
                end_date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers the rent payment of the current billing period of a
    /// `RentDetail`, advancing it to the next billing period.
    ///
    /// `amount` defaults to the rent due for a single billing period.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the authenticated `User` is not an owner;
    /// - `INVALID_PERIOD` - the provided period doesn't start before it ends;
    /// - `RENT_DETAIL_NOT_EXISTS` - the `RentDetail` does not exist or is not
    ///                              owned by the authenticated owner;
    /// - `INVALID_AMOUNT` - `amount` is not positive or is in a currency
    ///                      other than the rent one;
    /// - `RENT_ALREADY_PAID` - the rent is paid for the provided period;
    /// - `PERIOD_MISMATCH` - the provided period is not the current one;
    /// - `PERIOD_OUT_OF_RANGE` - no billing period follows the provided one.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = ?amount,
            gql.name = "createPaymentHistory",
            otel.name = Self::SPAN_NAME,
            payment_method = %payment_method,
            period = ?period,
            rent_detail_id = %rent_detail_id,
        ),
    )]
    pub async fn create_payment_history(
        rent_detail_id: api::rent_detail::Id,
        period: plan::PeriodInput,
        payment_method: api::payment::Method,
        amount: Option<Money>,
        ctx: &Context,
    ) -> Result<api::payment::CreateResult, Error> {
        let period = period.validate().map_err(ctx.error())?;
        let my_id = ctx.owner_session().await?.user_id;

        ctx.service()
            .execute(command::RegisterPayment {
                rent_detail_id: rent_detail_id.into(),
                owner_id: my_id.into(),
                period,
                method: payment_method.into(),
                amount,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contract` for renting the specified `Realty` out to the
    /// specified tenant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the authenticated `User` is not an owner;
    /// - `INVALID_PAYMENT_PLAN` - the `paymentPlan` is not recognized;
    /// - `INVALID_RENT` - `rentAmount` is not positive;
    /// - `TENANT_NOT_EXISTS` - the specified tenant does not exist;
    /// - `REALTY_NOT_EXISTS` - the specified `Realty` does not exist or is
    ///                         not listed by the authenticated owner;
    /// - `CONTRACT_EXISTS` - the `Contract` of the same parties upon the same
    ///                       `Realty` already exists;
    /// - `REALTY_OCCUPIED` - the `Realty` is contracted to another tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createContract",
            otel.name = Self::SPAN_NAME,
            payment_plan = %payment_plan,
            realty_id = %realty_id,
            rent_amount = %rent_amount,
            start_date = %start_date,
            tenant_id = %tenant_id,
        ),
    )]
    pub async fn create_contract(
        tenant_id: api::user::Id,
        realty_id: api::realty::Id,
        rent_amount: Money,
        payment_plan: String,
        start_date: Date,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let payment_plan = plan::parse(&payment_plan).map_err(ctx.error())?;
        let my_id = ctx.owner_session().await?.user_id;

        ctx.service()
            .execute(command::CreateContract {
                owner_id: my_id.into(),
                tenant_id: tenant_id.into(),
                realty_id: realty_id.into(),
                rent_amount,
                payment_plan,
                start_date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves the `Contract` offered to the authenticated tenant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_TENANT` - the authenticated `User` is not a tenant;
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` does not exist or is not
    ///                           offered to the authenticated tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "approveContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let my_id = ctx.tenant_session().await?.user_id;

        ctx.service()
            .execute(command::ApproveContract {
                contract_id: id.into(),
                tenant_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Terminates the `Contract` of the authenticated owner, releasing its
    /// `Realty` and dropping the `RentDetail` of the tenancy along with its
    /// `PaymentHistory`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the authenticated `User` is not an owner;
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` does not exist or is not
    ///                           owned by the authenticated owner.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "terminateContract",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn terminate_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let my_id = ctx.owner_session().await?.user_id;

        ctx.service()
            .execute(command::TerminateContract {
                contract_id: id.into(),
                owner_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Opens a conversation with the specified `User`, greeting them, unless
    /// it's opened already.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PARTNER_NOT_EXISTS` - the specified `User` does not exist or is not
    ///                          a counterpart of the authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createChat",
            otel.name = Self::SPAN_NAME,
            partner_id = %partner_id,
        ),
    )]
    pub async fn create_chat(
        partner_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::chat::CreateResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateChat {
                initiator_id: my_id.into(),
                partner_id: partner_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends a `ChatMessage` to the specified `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RECIPIENT_NOT_EXISTS` - the specified `User` does not exist or is
    ///                            not a counterpart of the authenticated
    ///                            `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendMessage",
            otel.name = Self::SPAN_NAME,
            recipient_id = %recipient_id,
        ),
    )]
    pub async fn send_message(
        recipient_id: api::user::Id,
        message: api::chat::Text,
        ctx: &Context,
    ) -> Result<api::Message, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SendMessage {
                sender_id: my_id.into(),
                recipient_id: recipient_id.into(),
                text: message.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks all the `ChatMessage`s sent by the specified `User` to the
    /// authenticated one as read.
    ///
    /// Returns the number of `ChatMessage`s marked as read.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markMessagesRead",
            otel.name = Self::SPAN_NAME,
            partner_id = %partner_id,
        ),
    )]
    pub async fn mark_messages_read(
        partner_id: api::user::Id,
        ctx: &Context,
    ) -> Result<i32, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let marked = ctx
            .service()
            .execute(command::MarkMessagesRead {
                reader_id: my_id.into(),
                partner_id: partner_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(i32::try_from(marked).unwrap_or(i32::MAX))
    }
}

impl AsError for command::create_rent_detail::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`startDate` must precede `endDate`"]
                InvalidPeriod,

                #[code = "INVALID_RENT"]
                #[status = BAD_REQUEST]
                #[message = "`monthlyRent` must be positive"]
                InvalidRent,

                #[code = "REALTY_OCCUPIED"]
                #[status = BAD_REQUEST]
                #[message = "`Realty` is rented by another tenant"]
                RealtyOccupied,

                #[code = "RENT_DETAIL_EXISTS"]
                #[status = BAD_REQUEST]
                #[message = "`RentDetail` of the tenant upon the `Realty` \
                             already exists"]
                RentDetailExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod(_) => Error::InvalidPeriod.into(),
            Self::InvalidRent(_) => Error::InvalidRent.into(),
            Self::RealtyOccupied(_) => Error::RealtyOccupied.into(),
            Self::RealtyNotExists(_) => RealtyError::NotExists.into(),
            Self::RentDetailExists(_) => Error::RentDetailExists.into(),
            Self::TenantNotExists(_) => TenantError::NotExists.into(),
        })
    }
}

impl AsError for command::register_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_AMOUNT"]
                #[status = BAD_REQUEST]
                #[message = "`amount` must be positive and in the rent \
                             currency"]
                InvalidAmount,

                #[code = "RENT_ALREADY_PAID"]
                #[status = BAD_REQUEST]
                #[message = "Rent is already paid for the period"]
                AlreadyPaid,

                #[code = "PERIOD_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Period is not the current one of the \
                             `RentDetail`"]
                PeriodMismatch,

                #[code = "PERIOD_OUT_OF_RANGE"]
                #[status = BAD_REQUEST]
                #[message = "No billing period follows the paid one"]
                PeriodOutOfRange,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyPaid(_) => Error::AlreadyPaid.into(),
            Self::InvalidAmount(_) => Error::InvalidAmount.into(),
            Self::PeriodMismatch { .. } => Error::PeriodMismatch.into(),
            Self::PeriodOutOfRange(_) => Error::PeriodOutOfRange.into(),
            Self::RentDetailNotExists(_) => RentDetailError::NotExists.into(),
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_EXISTS"]
                #[status = BAD_REQUEST]
                #[message = "`Contract` of the tenant upon the `Realty` \
                             already exists"]
                ContractExists,

                #[code = "INVALID_RENT"]
                #[status = BAD_REQUEST]
                #[message = "`rentAmount` must be positive"]
                InvalidRent,

                #[code = "REALTY_OCCUPIED"]
                #[status = BAD_REQUEST]
                #[message = "`Realty` is contracted to another tenant"]
                RealtyOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ContractExists(_) => Error::ContractExists.into(),
            Self::InvalidRent(_) => Error::InvalidRent.into(),
            Self::RealtyOccupied(_) => Error::RealtyOccupied.into(),
            Self::RealtyNotExists(_) => RealtyError::NotExists.into(),
            Self::TenantNotExists(_) => TenantError::NotExists.into(),
        })
    }
}

impl AsError for command::approve_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
        }
    }
}

impl AsError for command::terminate_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::RealtyNotExists(_) => Some(RealtyError::NotExists.into()),
        }
    }
}

impl AsError for command::create_chat::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PARTNER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "Counterpart `User` with the specified ID does \
                             not exist"]
                PartnerNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PartnerNotExists(_) => Error::PartnerNotExists.into(),
            Self::UserNotExists(_) => UserError::NotExists.into(),
        })
    }
}

impl AsError for command::send_message::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RECIPIENT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "Counterpart `User` with the specified ID does \
                             not exist"]
                RecipientNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RecipientNotExists(_) => Error::RecipientNotExists.into(),
            Self::UserNotExists(_) => UserError::NotExists.into(),
        })
    }
}

impl AsError for command::mark_messages_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum TenantError {
        #[code = "TENANT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Tenant with the specified ID does not exist"]
        NotExists,
    }
}
