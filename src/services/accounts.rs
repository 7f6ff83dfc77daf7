use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::{non_blank, require};
use crate::entities::{
    customer, image, pre_designed,
    tailor::{self, Expertise},
    user::{self, Role},
};
use crate::error::ServiceError;
use crate::lifecycle::pricing::check_price_limit;
use crate::middleware::auth::generate_token;

/// Body measurements, kept as short free-form strings ("38", "38.5in").
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct Measurements {
    #[validate(length(max = 20))]
    pub chest: Option<String>,
    #[validate(length(max = 20))]
    pub waist: Option<String>,
    #[validate(length(max = 20))]
    pub hip: Option<String>,
    #[validate(length(max = 20))]
    pub shoulder: Option<String>,
    #[validate(length(max = 20))]
    pub sleeve: Option<String>,
    #[validate(length(max = 20))]
    pub neck: Option<String>,
    #[validate(length(max = 20))]
    pub length: Option<String>,
    #[validate(length(max = 20))]
    pub inseam: Option<String>,
}

impl Measurements {
    pub fn from_customer(profile: &customer::Model) -> Self {
        Self {
            chest: profile.chest.clone(),
            waist: profile.waist.clone(),
            hip: profile.hip.clone(),
            shoulder: profile.shoulder.clone(),
            sleeve: profile.sleeve.clone(),
            neck: profile.neck.clone(),
            length: profile.length.clone(),
            inseam: profile.inseam.clone(),
        }
    }

    /// Every measurement the form left out is taken from the profile.
    pub fn or_profile(self, profile: &customer::Model) -> Self {
        let fallback = Self::from_customer(profile);
        Self {
            chest: non_blank(self.chest).or(fallback.chest),
            waist: non_blank(self.waist).or(fallback.waist),
            hip: non_blank(self.hip).or(fallback.hip),
            shoulder: non_blank(self.shoulder).or(fallback.shoulder),
            sleeve: non_blank(self.sleeve).or(fallback.sleeve),
            neck: non_blank(self.neck).or(fallback.neck),
            length: non_blank(self.length).or(fallback.length),
            inseam: non_blank(self.inseam).or(fallback.inseam),
        }
    }

    fn normalized(self) -> Self {
        Self {
            chest: non_blank(self.chest),
            waist: non_blank(self.waist),
            hip: non_blank(self.hip),
            shoulder: non_blank(self.shoulder),
            sleeve: non_blank(self.sleeve),
            neck: non_blank(self.neck),
            length: non_blank(self.length),
            inseam: non_blank(self.inseam),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RegisterCustomer {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RegisterTailor {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, max = 150))]
    pub full_name: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub business_name: String,
    #[validate(length(min = 1))]
    pub business_location: String,
    #[validate(length(min = 1, max = 20))]
    pub nid: String,
    #[serde(default)]
    pub expertise: Expertise,
    pub specialization: Option<String>,
    pub tailor_about: Option<String>,
    pub business_description: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Registered {
    pub user_id: i32,
    pub profile_id: i32,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub role: Role,
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// "Rahim Uddin Ahmed" -> ("Rahim", "Uddin Ahmed").
fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn check_passwords(password: &str, confirm: &str) -> Result<(), ServiceError> {
    if password != confirm {
        return Err(ServiceError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

fn check_price(price: Decimal) -> Result<Decimal, ServiceError> {
    if price.is_sign_negative() {
        return Err(ServiceError::Validation(
            "price cannot be negative".to_string(),
        ));
    }
    check_price_limit(price.round_dp(2), "price")
}

async fn create_user<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<user::Model, ServiceError> {
    let email = email.trim().to_lowercase();
    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(email.clone()))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(ServiceError::Validation("Email already exists".to_string()));
    }

    let (first_name, last_name) = split_full_name(full_name);
    let new_user = user::ActiveModel {
        email: Set(email),
        password: Set(hash_password(password)?),
        first_name: Set(first_name),
        last_name: Set(last_name),
        role: Set(role),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(new_user.insert(db).await?)
}

pub async fn register_customer<C: ConnectionTrait>(
    db: &C,
    payload: RegisterCustomer,
) -> Result<Registered, ServiceError> {
    payload.validate()?;
    check_passwords(&payload.password, &payload.confirm_password)?;

    let user = create_user(
        db,
        &payload.email,
        &payload.password,
        &payload.full_name,
        Role::Customer,
    )
    .await?;

    let profile = customer::ActiveModel {
        user_id: Set(user.id),
        phone: Set(non_blank(payload.phone)),
        address: Set(non_blank(payload.address)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = user.id, customer_id = profile.id, "Registered customer");
    Ok(Registered {
        user_id: user.id,
        profile_id: profile.id,
        role: Role::Customer,
    })
}

pub async fn register_tailor<C: ConnectionTrait>(
    db: &C,
    payload: RegisterTailor,
) -> Result<Registered, ServiceError> {
    payload.validate()?;
    check_passwords(&payload.password, &payload.confirm_password)?;

    let nid = require(&payload.nid, "nid")?;
    let nid_taken = tailor::Entity::find()
        .filter(tailor::Column::Nid.eq(nid.clone()))
        .count(db)
        .await?;
    if nid_taken > 0 {
        return Err(ServiceError::Validation("NID already registered".to_string()));
    }
    let price = check_price(payload.price.unwrap_or_default())?;

    let user = create_user(
        db,
        &payload.email,
        &payload.password,
        &payload.full_name,
        Role::Tailor,
    )
    .await?;

    let specialization = non_blank(payload.specialization);
    let profile = tailor::ActiveModel {
        user_id: Set(user.id),
        business_name: Set(require(&payload.business_name, "business_name")?),
        business_location: Set(require(&payload.business_location, "business_location")?),
        tailor_about: Set(non_blank(payload.tailor_about)),
        business_description: Set(non_blank(payload.business_description)),
        phone: Set(non_blank(payload.phone)),
        expertise: Set(payload.expertise),
        category: Set(specialization.clone()),
        services_offered: Set(specialization),
        price: Set(price),
        nid: Set(nid),
        average_rating: Set(0.0),
        is_available: Set(true),
        total_earning: Set(Decimal::ZERO),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = user.id, tailor_id = profile.id, "Registered tailor");
    Ok(Registered {
        user_id: user.id,
        profile_id: profile.id,
        role: Role::Tailor,
    })
}

pub async fn login<C: ConnectionTrait>(
    db: &C,
    payload: Login,
    secret: &str,
    ttl_hours: i64,
) -> Result<LoginResponse, ServiceError> {
    let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(payload.email.trim().to_lowercase()))
        .one(db)
        .await?
        .ok_or_else(invalid)?;
    user.check_hash(&payload.password).map_err(|_| invalid())?;

    let token = generate_token(user.id, user.role, secret, ttl_hours)
        .map_err(|e| ServiceError::Token(e.to_string()))?;

    info!(user_id = user.id, role = %user.role, "Logged in");
    Ok(LoginResponse {
        token,
        user_id: user.id,
        role: user.role,
    })
}

pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id))
}

pub async fn customer_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<customer::Model, ServiceError> {
    customer::Entity::find()
        .filter(customer::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Customer profile not found".to_string()))
}

pub async fn tailor_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<tailor::Model, ServiceError> {
    tailor::Entity::find()
        .filter(tailor::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Tailor profile not found".to_string()))
}

#[derive(Clone, Debug, Serialize)]
pub struct CustomerProfile {
    pub id: i32,
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub measurements: Measurements,
}

impl CustomerProfile {
    fn new(user: user::Model, profile: customer::Model) -> Self {
        Self {
            id: profile.id,
            user_id: user.id,
            measurements: Measurements::from_customer(&profile),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: profile.phone,
            address: profile.address,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchCustomerProfile {
    #[validate(length(min = 1, max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn get_customer_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<CustomerProfile, ServiceError> {
    let user = find_user(db, user_id).await?;
    let profile = customer_for_user(db, user_id).await?;
    Ok(CustomerProfile::new(user, profile))
}

pub async fn patch_customer_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    payload: PatchCustomerProfile,
) -> Result<CustomerProfile, ServiceError> {
    payload.validate()?;
    let user = find_user(db, user_id).await?;
    let profile = customer_for_user(db, user_id).await?;

    let user = if payload.first_name.is_some() || payload.last_name.is_some() {
        let mut active: user::ActiveModel = user.into();
        if let Some(first_name) = payload.first_name {
            active.first_name = Set(require(&first_name, "first_name")?);
        }
        if let Some(last_name) = payload.last_name {
            active.last_name = Set(last_name.trim().to_string());
        }
        active.update(db).await?
    } else {
        user
    };

    let mut active: customer::ActiveModel = profile.into();
    if let Some(phone) = payload.phone {
        active.phone = Set(non_blank(Some(phone)));
    }
    if let Some(address) = payload.address {
        active.address = Set(non_blank(Some(address)));
    }
    let profile = active.update(db).await?;

    info!(user_id, "Updated customer profile");
    Ok(CustomerProfile::new(user, profile))
}

/// Replaces the whole measurement profile. Orders already placed keep
/// the measurements they were placed with.
pub async fn replace_measurements<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    measurements: Measurements,
) -> Result<Measurements, ServiceError> {
    measurements.validate()?;
    let measurements = measurements.normalized();
    let profile = customer_for_user(db, user_id).await?;

    let mut active: customer::ActiveModel = profile.into();
    active.chest = Set(measurements.chest.clone());
    active.waist = Set(measurements.waist.clone());
    active.hip = Set(measurements.hip.clone());
    active.shoulder = Set(measurements.shoulder.clone());
    active.sleeve = Set(measurements.sleeve.clone());
    active.neck = Set(measurements.neck.clone());
    active.length = Set(measurements.length.clone());
    active.inseam = Set(measurements.inseam.clone());
    let profile = active.update(db).await?;

    info!(user_id, customer_id = profile.id, "Replaced measurements");
    Ok(Measurements::from_customer(&profile))
}

#[derive(Clone, Debug, Serialize)]
pub struct TailorProfile {
    #[serde(flatten)]
    pub tailor: tailor::Model,
    pub email: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchTailorProfile {
    #[validate(length(min = 1, max = 100))]
    pub business_name: Option<String>,
    #[validate(length(min = 1))]
    pub business_location: Option<String>,
    pub tailor_about: Option<String>,
    pub business_description: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    pub expertise: Option<Expertise>,
    pub category: Option<String>,
    pub services_offered: Option<String>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}

pub async fn get_tailor_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<TailorProfile, ServiceError> {
    let user = find_user(db, user_id).await?;
    let tailor = tailor_for_user(db, user_id).await?;
    Ok(TailorProfile {
        tailor,
        full_name: user.full_name(),
        email: user.email,
    })
}

/// A new base price only affects orders placed afterwards.
pub async fn patch_tailor_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    payload: PatchTailorProfile,
) -> Result<TailorProfile, ServiceError> {
    payload.validate()?;
    let user = find_user(db, user_id).await?;
    let tailor = tailor_for_user(db, user_id).await?;

    let mut active: tailor::ActiveModel = tailor.into();
    if let Some(name) = payload.business_name {
        active.business_name = Set(require(&name, "business_name")?);
    }
    if let Some(location) = payload.business_location {
        active.business_location = Set(require(&location, "business_location")?);
    }
    if let Some(about) = payload.tailor_about {
        active.tailor_about = Set(non_blank(Some(about)));
    }
    if let Some(description) = payload.business_description {
        active.business_description = Set(non_blank(Some(description)));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(non_blank(Some(phone)));
    }
    if let Some(expertise) = payload.expertise {
        active.expertise = Set(expertise);
    }
    if let Some(category) = payload.category {
        active.category = Set(non_blank(Some(category)));
    }
    if let Some(services) = payload.services_offered {
        active.services_offered = Set(non_blank(Some(services)));
    }
    if let Some(price) = payload.price {
        active.price = Set(check_price(price)?);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    let tailor = active.update(db).await?;

    info!(user_id, tailor_id = tailor.id, "Updated tailor profile");
    Ok(TailorProfile {
        tailor,
        full_name: user.full_name(),
        email: user.email,
    })
}

/// Deletes the account and, through the foreign keys, everything it owns.
/// Returns the stored names of image files that no longer have a row.
pub async fn delete_account<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<String>, ServiceError> {
    let user = find_user(db, user_id).await?;

    let mut orphaned_files = Vec::new();
    if user.role == Role::Tailor {
        let tailor = tailor_for_user(db, user_id).await?;
        let dress_ids: Vec<i32> = pre_designed::Entity::find()
            .select_only()
            .column(pre_designed::Column::Id)
            .filter(pre_designed::Column::TailorId.eq(tailor.id))
            .into_tuple()
            .all(db)
            .await?;
        orphaned_files = image::Entity::find()
            .filter(image::Column::PreDesignedId.is_in(dress_ids))
            .all(db)
            .await?
            .iter()
            .map(image::Model::stored_name)
            .collect();
    }

    user::Entity::delete_by_id(user.id).exec(db).await?;
    info!(user_id, role = %user.role, "Deleted account");
    Ok(orphaned_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_splits_on_first_word() {
        assert_eq!(
            split_full_name("Rahim Uddin Ahmed"),
            ("Rahim".to_string(), "Uddin Ahmed".to_string())
        );
        assert_eq!(split_full_name("Mitu"), ("Mitu".to_string(), String::new()));
        assert_eq!(split_full_name("  "), (String::new(), String::new()));
    }

    #[test]
    fn form_measurements_win_over_profile() {
        let profile = customer::Model {
            id: 1,
            user_id: 1,
            phone: None,
            address: None,
            chest: Some("40".to_string()),
            waist: Some("34".to_string()),
            hip: None,
            shoulder: None,
            sleeve: None,
            neck: None,
            length: None,
            inseam: None,
        };
        let form = Measurements {
            chest: Some("42".to_string()),
            waist: Some(" ".to_string()),
            ..Default::default()
        };
        let merged = form.or_profile(&profile);
        assert_eq!(merged.chest.as_deref(), Some("42"));
        assert_eq!(merged.waist.as_deref(), Some("34"));
        assert_eq!(merged.hip, None);
    }
}
