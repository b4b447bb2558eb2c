pub use super::category::Entity as Category;
pub use super::listing::Entity as Listing;
pub use super::profile::Entity as Profile;
pub use super::stripe_event::Entity as StripeEvent;
pub use super::subscription::Entity as Subscription;
