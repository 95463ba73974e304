//! Domain models for the auth service.

pub mod account;

pub use account::{
    Account, AccountView, NewAccount, NewUser, NewVendor, Profile, UserProfile, VendorProfile,
};
