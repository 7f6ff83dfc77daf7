mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use std::str::FromStr;

use common::{customer, date, dress, monday, setup_db, tailor};
use dorzi::entities::{
    custom_order, dress_order, favorite_tailor, order_status::OrderStatus, review,
    tailor as tailor_entity,
};
use dorzi::error::ServiceError;
use dorzi::lifecycle::{OrderKind, TotalPrice, WorkingCalendar};
use dorzi::services::{
    accounts,
    catalog::{self, NewEmbroidery},
    favorites,
    orders::{self, NewCustomOrder, NewDressOrder},
    reviews::{self, NewReview},
};

fn custom_form() -> NewCustomOrder {
    NewCustomOrder {
        address: "House 4, Road 2, Dhanmondi".to_string(),
        garment_type: Some("Panjabi".to_string()),
        occasions: vec!["Eid".to_string(), " ".to_string(), "Wedding".to_string()],
        ..Default::default()
    }
}

fn dress_form(
    tailor_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Option<Decimal>,
) -> NewDressOrder {
    NewDressOrder {
        tailor_id,
        product_id,
        quantity,
        unit_price,
        full_name: "Rahim Uddin".to_string(),
        address: "House 4, Road 2, Dhanmondi".to_string(),
        phone: "01700000000".to_string(),
        ..Default::default()
    }
}

async fn embroidery(db: &sea_orm::DatabaseConnection, tailor_id: i32, price: &str) -> i32 {
    let form: NewEmbroidery = serde_json::from_value(serde_json::json!({
        "title": "Zari border",
        "price": price
    }))
    .unwrap();
    catalog::create_embroidery(db, tailor_id, form, monday())
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn first_custom_order_costs_the_tailor_price() {
    let db = setup_db().await;
    let c1 = customer(&db, "c1@example.com").await;
    let t1 = tailor(&db, "t1@example.com", "NID-1", "500").await;

    let placed = orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c1.profile_id,
        t1.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();

    assert_eq!(placed.display_id, "TORD-001");
    assert_eq!(placed.total_price, dec!(500));
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.delivery_date, date(2024, 1, 30));

    let listed = orders::list_orders_for_customer(&db, c1.profile_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order_id, "TORD-001");
    assert_eq!(listed[0].amount, dec!(500));
    assert_eq!(listed[0].tailor_name.as_deref(), Some("NID-1 Stitches"));

    let stored = custom_order::Entity::find_by_id(placed.order_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.occasion.as_deref(), Some("Eid, Wedding"));
    assert_eq!(stored.contact_number.as_deref(), Some("01700000000"));
}

#[tokio::test]
async fn custom_price_adds_embroidery_unless_overridden() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-2", "500").await;
    let e = embroidery(&db, t.profile_id, "150").await;
    let calendar = WorkingCalendar::default();

    let with_embroidery = NewCustomOrder {
        embroidery_id: Some(e),
        ..custom_form()
    };
    let placed = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        with_embroidery.clone(),
        monday(),
    )
    .await
    .unwrap();
    assert_eq!(placed.total_price, dec!(650));

    let explicit = NewCustomOrder {
        price: Some(dec!(999.99)),
        ..with_embroidery.clone()
    };
    let placed = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        explicit,
        monday(),
    )
    .await
    .unwrap();
    assert_eq!(placed.total_price, dec!(999.99));

    let zero = NewCustomOrder {
        price: Some(Decimal::ZERO),
        ..with_embroidery
    };
    let placed = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        zero,
        monday(),
    )
    .await
    .unwrap();
    assert_eq!(placed.total_price, dec!(650));
}

#[tokio::test]
async fn custom_order_rejects_missing_references() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-3", "500").await;
    let other = tailor(&db, "other@example.com", "NID-4", "300").await;
    let foreign_embroidery = embroidery(&db, other.profile_id, "80").await;
    let calendar = WorkingCalendar::default();

    let err = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        999,
        custom_form(),
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = orders::create_custom_order(
        &db,
        &calendar,
        999,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let form = NewCustomOrder {
        embroidery_id: Some(foreign_embroidery),
        ..custom_form()
    };
    let err = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        form,
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let form = NewCustomOrder {
        address: "   ".to_string(),
        ..custom_form()
    };
    let err = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        form,
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn later_price_changes_do_not_touch_placed_orders() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-5", "500").await;
    let e = embroidery(&db, t.profile_id, "100").await;

    let form = NewCustomOrder {
        embroidery_id: Some(e),
        ..custom_form()
    };
    let placed = orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        form,
        monday(),
    )
    .await
    .unwrap();

    let stored_tailor = tailor_entity::Entity::find_by_id(t.profile_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let mut active: tailor_entity::ActiveModel = stored_tailor.into();
    active.price = Set(dec!(900));
    active.update(&db).await.unwrap();

    catalog::delete_embroidery(&db, t.profile_id, e).await.unwrap();

    let stored = custom_order::Entity::find_by_id(placed.order_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_price(), dec!(600));
    assert_eq!(stored.embroidery_id, None);
}

#[tokio::test]
async fn dress_order_total_is_quantity_times_unit_price() {
    let db = setup_db().await;
    let c2 = customer(&db, "c2@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-6", "500").await;
    let product = dress(&db, t.profile_id, "200").await;

    let placed = orders::create_dress_order(
        &db,
        c2.user_id,
        dress_form(t.profile_id, product, 3, None),
        monday(),
    )
    .await
    .unwrap();

    assert_eq!(placed.display_id, "DORD-001");
    assert_eq!(placed.total_price, dec!(600));
    assert_eq!(placed.delivery_date, date(2024, 1, 11));

    let stored = dress_order::Entity::find_by_id(placed.order_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_price(), dec!(600));
    assert_eq!(stored.unit_price, dec!(200));

    let listed = orders::list_orders_for_customer(&db, c2.profile_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, OrderKind::Dress);
    assert_eq!(listed[0].quantity, Some(3));
}

#[tokio::test]
async fn dress_order_rejects_bad_input() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-7", "500").await;
    let other = tailor(&db, "other@example.com", "NID-8", "500").await;
    let product = dress(&db, t.profile_id, "200").await;

    for quantity in [0, -2] {
        let err = orders::create_dress_order(
            &db,
            c.user_id,
            dress_form(t.profile_id, product, quantity, None),
            monday(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "quantity {quantity}");
    }

    for price in [Decimal::ZERO, dec!(-5)] {
        let err = orders::create_dress_order(
            &db,
            c.user_id,
            dress_form(t.profile_id, product, 1, Some(price)),
            monday(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "price {price}");
    }

    let err = orders::create_dress_order(
        &db,
        c.user_id,
        dress_form(other.profile_id, product, 1, None),
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = orders::create_dress_order(
        &db,
        c.user_id,
        dress_form(t.profile_id, 999, 1, None),
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn status_follows_the_transition_table() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-9", "500").await;
    let placed = orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();
    let id = placed.order_id;
    let today = date(2024, 1, 20);

    let err = orders::update_order_status(
        &db,
        t.profile_id,
        OrderKind::Custom,
        id,
        "shipped",
        today,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    let err = orders::update_order_status(
        &db,
        t.profile_id,
        OrderKind::Custom,
        id,
        "stitched",
        today,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    for next in ["processing", "shipped", "delivered"] {
        orders::update_order_status(&db, t.profile_id, OrderKind::Custom, id, next, today)
            .await
            .unwrap();
    }

    let stored = custom_order::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Delivered);
    assert_eq!(stored.deliver, Some(today));

    let err = orders::update_order_status(
        &db,
        t.profile_id,
        OrderKind::Custom,
        id,
        "canceled",
        today,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    // Re-applying the terminal status changes nothing, earnings included.
    let change = orders::update_order_status(
        &db,
        t.profile_id,
        OrderKind::Custom,
        id,
        "delivered",
        today,
    )
    .await
    .unwrap();
    assert_eq!(change.from, change.to);

    let profile = tailor_entity::Entity::find_by_id(t.profile_id).one(&db).await.unwrap().unwrap();
    assert_eq!(profile.total_earning, dec!(500));
}

#[tokio::test]
async fn orders_of_other_tailors_look_missing() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-10", "500").await;
    let other = tailor(&db, "other@example.com", "NID-11", "500").await;
    let placed = orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();

    let err = orders::update_order_status(
        &db,
        other.profile_id,
        OrderKind::Custom,
        placed.order_id,
        "processing",
        date(2024, 1, 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = orders::update_order_status(
        &db,
        t.profile_id,
        OrderKind::Dress,
        placed.order_id,
        "processing",
        date(2024, 1, 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn milestones_are_settable_in_order_only() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-12", "500").await;
    let product = dress(&db, t.profile_id, "200").await;
    let placed = orders::create_dress_order(
        &db,
        c.user_id,
        dress_form(t.profile_id, product, 1, None),
        monday(),
    )
    .await
    .unwrap();
    let id = placed.order_id;

    let change = orders::update_milestone_date(
        &db,
        t.profile_id,
        OrderKind::Dress,
        id,
        "production",
        Some(date(2024, 1, 5)),
    )
    .await
    .unwrap();
    assert_eq!(change.milestone, "production");
    assert_eq!(change.timeline.len(), 4);

    let err = orders::update_milestone_date(
        &db,
        t.profile_id,
        OrderKind::Dress,
        id,
        "order_confirmed",
        Some(date(2024, 1, 6)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    orders::update_milestone_date(
        &db,
        t.profile_id,
        OrderKind::Dress,
        id,
        "order_confirmed",
        Some(date(2024, 1, 2)),
    )
    .await
    .unwrap();

    let err = orders::update_milestone_date(
        &db,
        t.profile_id,
        OrderKind::Dress,
        id,
        "cutting_started",
        Some(date(2024, 1, 3)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // Clearing leaves the status alone.
    orders::update_milestone_date(&db, t.profile_id, OrderKind::Dress, id, "production", None)
        .await
        .unwrap();
    let stored = dress_order::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.production, None);
    assert_eq!(stored.order_confirmed, Some(date(2024, 1, 2)));
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn dashboard_counts_add_up() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-13", "500").await;
    let product = dress(&db, t.profile_id, "200").await;
    let calendar = WorkingCalendar::default();

    let first = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();
    orders::create_custom_order(&db, &calendar, c.profile_id, t.profile_id, custom_form(), monday())
        .await
        .unwrap();
    orders::create_dress_order(&db, c.user_id, dress_form(t.profile_id, product, 2, None), monday())
        .await
        .unwrap();

    for next in ["processing", "shipped", "delivered"] {
        orders::update_order_status(
            &db,
            t.profile_id,
            OrderKind::Custom,
            first.order_id,
            next,
            date(2024, 1, 25),
        )
        .await
        .unwrap();
    }

    let dashboard = orders::customer_dashboard(&db, c.profile_id).await.unwrap();
    assert_eq!(dashboard.stats.total_orders, 3);
    assert_eq!(dashboard.stats.completed_orders, 1);
    assert_eq!(
        dashboard.stats.total_orders,
        dashboard.stats.completed_orders + dashboard.stats.pending_orders
    );
    // Custom orders are due later than dress orders.
    assert_eq!(dashboard.orders.last().map(|o| o.kind), Some(OrderKind::Dress));

    let tailor_view = orders::tailor_dashboard(&db, t.profile_id).await.unwrap();
    assert_eq!(tailor_view.stats, dashboard.stats);
    assert_eq!(tailor_view.dresses, 1);
    assert_eq!(tailor_view.earnings, dec!(500));
}

#[tokio::test]
async fn deleting_a_tailor_removes_their_orders() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-14", "500").await;
    let product = dress(&db, t.profile_id, "200").await;

    orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();
    orders::create_dress_order(&db, c.user_id, dress_form(t.profile_id, product, 1, None), monday())
        .await
        .unwrap();

    accounts::delete_account(&db, t.user_id).await.unwrap();

    let listed = orders::list_orders_for_customer(&db, c.profile_id).await.unwrap();
    assert!(listed.is_empty());
    assert!(tailor_entity::Entity::find_by_id(t.profile_id).one(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn oversized_money_is_rejected() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-15", "500").await;
    let product = dress(&db, t.profile_id, "200").await;

    let huge = Decimal::from_str("79228162514264337593543950").unwrap();
    for unit_price in [huge, dec!(100000000)] {
        let form = dress_form(t.profile_id, product, 1000, Some(unit_price));
        let err = orders::create_dress_order(&db, c.user_id, form, monday())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "unit price {unit_price}");
    }

    let form = dress_form(t.profile_id, product, 1000, Some(dec!(99999999.99)));
    let placed = orders::create_dress_order(&db, c.user_id, form, monday())
        .await
        .unwrap();
    assert_eq!(placed.total_price, dec!(99999999990));

    let form = NewCustomOrder {
        price: Some(huge),
        ..custom_form()
    };
    let calendar = WorkingCalendar::default();
    let err = orders::create_custom_order(
        &db,
        &calendar,
        c.profile_id,
        t.profile_id,
        form,
        monday(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = accounts::register_tailor(
        &db,
        common::tailor_form("rich@example.com", "NID-16", "100000000"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_customer_removes_their_orders() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-17", "500").await;
    let product = dress(&db, t.profile_id, "200").await;

    orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();
    let form = dress_form(t.profile_id, product, 1, None);
    orders::create_dress_order(&db, c.user_id, form, monday())
        .await
        .unwrap();
    favorites::toggle_favorite_tailor(&db, c.profile_id, t.profile_id, monday())
        .await
        .unwrap();
    let review = NewReview {
        tailor_id: None,
        product_id: Some(product),
        rating: 4,
        comment: None,
    };
    reviews::create_review(&db, c.profile_id, review, monday())
        .await
        .unwrap();

    accounts::delete_account(&db, c.user_id).await.unwrap();

    assert_eq!(custom_order::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(dress_order::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(favorite_tailor::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(review::Entity::find().count(&db).await.unwrap(), 0);
    assert!(tailor_entity::Entity::find_by_id(t.profile_id)
        .one(&db)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn delivered_orders_keep_their_deliver_date() {
    let db = setup_db().await;
    let c = customer(&db, "c@example.com").await;
    let t = tailor(&db, "t@example.com", "NID-18", "500").await;
    let placed = orders::create_custom_order(
        &db,
        &WorkingCalendar::default(),
        c.profile_id,
        t.profile_id,
        custom_form(),
        monday(),
    )
    .await
    .unwrap();
    let id = placed.order_id;
    let kind = OrderKind::Custom;

    orders::update_milestone_date(
        &db,
        t.profile_id,
        kind,
        id,
        "stitching_started",
        Some(date(2024, 2, 1)),
    )
    .await
    .unwrap();
    for next in ["processing", "shipped", "delivered"] {
        orders::update_order_status(&db, t.profile_id, kind, id, next, date(2024, 1, 20))
            .await
            .unwrap();
    }

    let stored = custom_order::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.deliver, Some(date(2024, 2, 1)));

    let err = orders::update_milestone_date(&db, t.profile_id, kind, id, "deliver", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    orders::update_milestone_date(&db, t.profile_id, kind, id, "deliver", Some(date(2024, 2, 3)))
        .await
        .unwrap();
    let stored = custom_order::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.deliver, Some(date(2024, 2, 3)));
}
