use utoipa::OpenApi;

use cultura_models::events::{
    CreateEventRequest, EventCategory, EventDetail, EventStatus, EventSummary, UpdateEventRequest,
};
use cultura_models::subscriptions::{Plan, SubscriptionDetail, SubscriptionStatus, UpgradeRequest};
use cultura_models::users::{
    RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, TokenRequest, TokenResponse,
    UpdateUserRequest, UserProfile, UserType,
};
use cultura_models::venues::{
    CreateVenueRequest, UpdateVenueRequest, VenueCategory, VenueDetail, VenueStatus, VenueSummary,
};

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cultura API",
        description = "REST backend for the local cultural events platform: \
                       accounts, venues, events and subscription plans.",
        version = "1.0.0"
    ),
    paths(
        handlers::users::register,
        handlers::users::obtain_token,
        handlers::users::refresh_token,
        handlers::users::me,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::venues::list_venues,
        handlers::venues::get_venue,
        handlers::venues::create_venue,
        handlers::venues::update_venue,
        handlers::venues::delete_venue,
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::subscriptions::list_plans,
        handlers::subscriptions::get_plan,
        handlers::subscriptions::my_subscription,
        handlers::subscriptions::upgrade,
    ),
    components(schemas(
        UserType,
        UserProfile,
        RegisterRequest,
        UpdateUserRequest,
        TokenRequest,
        TokenResponse,
        RefreshTokenRequest,
        RefreshTokenResponse,
        VenueCategory,
        VenueStatus,
        VenueDetail,
        VenueSummary,
        CreateVenueRequest,
        UpdateVenueRequest,
        EventCategory,
        EventStatus,
        EventDetail,
        EventSummary,
        CreateEventRequest,
        UpdateEventRequest,
        Plan,
        SubscriptionStatus,
        SubscriptionDetail,
        UpgradeRequest,
    )),
    tags(
        (name = "users", description = "Accounts and token endpoints"),
        (name = "venues", description = "Cultural venues"),
        (name = "events", description = "Events hosted at venues"),
        (name = "subscriptions", description = "Plans and the caller's subscription")
    )
)]
pub struct ApiDoc;
