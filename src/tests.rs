#[cfg(test)]
mod integration_tests {
    use crate::handlers::cars::CreateCarRequest;
    use crate::schemas::{ApiResponse, AppState};
    use crate::test_utils::test_utils::{app_with_state, setup_test_app, setup_test_app_state};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use model::entities::{car, expense, financing, income, month};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

    /// Decimal fields serialize as strings; parse for scale-insensitive
    /// comparison.
    fn dec_field(v: &serde_json::Value) -> f64 {
        v.as_str().expect("expected a decimal string").parse().unwrap()
    }

    fn ev_request() -> CreateCarRequest {
        CreateCarRequest {
            model: "Volvo EX30".to_string(),
            year: 2022,
            vehicle_type: "EV".to_string(),
            consumption_kwh_per_100km: Some(18.0),
            consumption_l_per_100km: None,
            battery_capacity_kwh: Some(64.0),
            estimated_purchase_price: 300_000.0,
            summer_tires_price: Some(8_000.0),
            winter_tires_price: Some(8_000.0),
            tire_replacement_interval_years: None,
            full_insurance_year: None,
            half_insurance_year: None,
            car_tax_year: None,
            repairs_year: None,
            expected_value_after_3y: None,
            expected_value_after_5y: None,
            expected_value_after_8y: None,
        }
    }

    async fn seed_month(
        db: &DatabaseConnection,
        year: i32,
        month_no: u32,
        starting: Decimal,
        income_amount: Decimal,
        expense_amount: Decimal,
    ) -> i32 {
        let m = month::ActiveModel {
            month_date: Set(NaiveDate::from_ymd_opt(year, month_no, 1).unwrap()),
            starting_funds: Set(starting),
            ending_funds: Set(Decimal::ZERO),
            surplus: Set(Decimal::ZERO),
            loan_remaining: Set(Decimal::ZERO),
            is_current: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed month");

        income::ActiveModel {
            month_id: Set(m.id),
            source: Set(Some("Salary".to_string())),
            person: Set(Some("Alex".to_string())),
            amount: Set(income_amount),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed income");

        expense::ActiveModel {
            month_id: Set(m.id),
            name: Set(Some("Hushall".to_string())),
            category: Set(None),
            amount: Set(expense_amount),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed expense");

        m.id
    }

    async fn seed_three_months(db: &DatabaseConnection) -> Vec<i32> {
        let mut ids = Vec::new();
        for month_no in 1..=3 {
            let starting = if month_no == 1 { dec!(10_000) } else { Decimal::ZERO };
            ids.push(seed_month(db, 2026, month_no, starting, dec!(30_000), dec!(18_000)).await);
        }
        ids
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_car_returns_derived_report() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.post("/api/cars").json(&ev_request()).await;
        response.assert_status(StatusCode::CREATED);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Car created successfully");

        let report = &body.data;
        assert_eq!(report["model"], "Volvo EX30");
        assert_eq!(report["vehicle_type"], "EV");
        assert!(report["id"].as_i64().unwrap() > 0);

        // Default prices: 18 kWh/100km at 2.75 SEK/kWh over 18,000 km.
        assert_eq!(report["energy_cost_year"].as_f64().unwrap(), 8_910.0);
        // Tires amortized over the default 3-year lifespan.
        assert!((report["tires_year_effective"].as_f64().unwrap() - 5_333.33).abs() < 0.01);
        // Estimators fill the missing figures, so the totals are complete.
        assert!(report["full_insurance_year_effective"].as_f64().unwrap() > 0.0);
        assert!(report["tco_total_3y"].as_f64().unwrap() > 0.0);
        assert!(
            report["tco_per_month_3y"].as_f64().unwrap()
                < report["tco_total_3y"].as_f64().unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_car_rejects_unknown_vehicle_type() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let mut request = ev_request();
        request.vehicle_type = "Hydrogen".to_string();

        let response = server.post("/api/cars").json(&request).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_cars() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        server
            .post("/api/cars")
            .json(&ev_request())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/api/cars").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["model"], "Volvo EX30");

        // Second read is served from the cache with identical content.
        let cached: ApiResponse<Vec<serde_json::Value>> = server.get("/api/cars").await.json();
        assert_eq!(cached.data, body.data);
    }

    #[tokio::test]
    async fn test_update_car_recomputes_and_persists_mirrors() {
        let state: AppState = setup_test_app_state().await;
        let server = TestServer::new(app_with_state(state.clone())).unwrap();

        let created: ApiResponse<serde_json::Value> =
            server.post("/api/cars").json(&ev_request()).await.json();
        let car_id = created.data["id"].as_i64().unwrap();
        let tco_before = created.data["tco_total_3y"].as_f64().unwrap();

        let response = server
            .put(&format!("/api/cars/{}", car_id))
            .json(&serde_json::json!({ "estimated_purchase_price": 150_000.0 }))
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["estimated_purchase_price"].as_f64().unwrap(), 150_000.0);
        let tco_after = body.data["tco_total_3y"].as_f64().unwrap();
        assert!(tco_after < tco_before);

        // The stored row mirrors the recomputed totals.
        let stored = car::Entity::find_by_id(car_id as i32)
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.tco_3_years, Some(tco_after));
    }

    #[tokio::test]
    async fn test_update_car_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .put("/api/cars/99999")
            .json(&serde_json::json!({ "year": 2024 }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_car() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let created: ApiResponse<serde_json::Value> =
            server.post("/api/cars").json(&ev_request()).await.json();
        let car_id = created.data["id"].as_i64().unwrap();

        let response = server.delete(&format!("/api/cars/{}", car_id)).await;
        response.assert_status(StatusCode::OK);

        // A second delete finds nothing.
        let response = server.delete(&format!("/api/cars/{}", car_id)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: ApiResponse<Vec<serde_json::Value>> = server.get("/api/cars").await.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_months_rollforward_chains_and_reconciles() {
        let state: AppState = setup_test_app_state().await;
        let month_ids = seed_three_months(&state.db).await;
        financing::ActiveModel {
            name: Set("loans_taken".to_string()),
            value: Set(dec!(2_000_000)),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();

        let server = TestServer::new(app_with_state(state.clone())).unwrap();
        let response = server.get("/api/months").add_query_param("anchor", "2026-01").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 3);

        // The chain runs 10k starting funds plus a 12k surplus per month.
        assert_eq!(body.data[0]["name"], "January 2026");
        assert_eq!(dec_field(&body.data[0]["starting_funds"]), 10_000.0);
        assert_eq!(dec_field(&body.data[0]["surplus"]), 12_000.0);
        assert_eq!(dec_field(&body.data[0]["ending_funds"]), 22_000.0);
        assert_eq!(dec_field(&body.data[1]["starting_funds"]), 22_000.0);
        assert_eq!(dec_field(&body.data[2]["ending_funds"]), 46_000.0);
        assert_eq!(dec_field(&body.data[0]["loan_remaining"]), 2_000_000.0);
        assert_eq!(dec_field(&body.data[0]["incomes_by_person"]["Alex"]), 30_000.0);
        assert_eq!(body.data[0]["expenses"][0]["category"], "Other");
        assert!(body.data[0]["is_current"].as_bool().unwrap());
        assert!(!body.data[1]["is_current"].as_bool().unwrap());

        // The read healed the drifted stored rows.
        let stored = month::Entity::find_by_id(month_ids[2])
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.ending_funds, dec!(46_000));
        assert_eq!(stored.starting_funds, dec!(34_000));
    }

    #[tokio::test]
    async fn test_months_anchor_slices_the_ledger() {
        let state: AppState = setup_test_app_state().await;
        seed_three_months(&state.db).await;

        let server = TestServer::new(app_with_state(state)).unwrap();
        let body: ApiResponse<Vec<serde_json::Value>> = server
            .get("/api/months")
            .add_query_param("anchor", "2026-02")
            .await
            .json();

        // The anchor month and everything after it; history is cut off,
        // but February still chains from January's computed balance.
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0]["name"], "February 2026");
        assert_eq!(dec_field(&body.data[0]["starting_funds"]), 22_000.0);
    }

    #[tokio::test]
    async fn test_months_anchor_past_the_end_is_empty() {
        let state: AppState = setup_test_app_state().await;
        seed_three_months(&state.db).await;

        let server = TestServer::new(app_with_state(state)).unwrap();
        let response = server.get("/api/months").add_query_param("anchor", "2030-01").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_months_rejects_malformed_anchor() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/months").add_query_param("anchor", "not-a-month").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_months_all_is_read_only() {
        let state: AppState = setup_test_app_state().await;
        let month_ids = seed_three_months(&state.db).await;

        let server = TestServer::new(app_with_state(state.clone())).unwrap();
        let response = server.get("/api/months/all").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 3);
        assert_eq!(dec_field(&body.data[1]["starting_funds"]), 22_000.0);

        // The stored rows keep their seeded zeros; only /api/months heals.
        let stored = month::Entity::find_by_id(month_ids[1])
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.ending_funds, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_price_settings_roundtrip_affects_reports() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Defaults apply while no row exists.
        let body: ApiResponse<serde_json::Value> = server.get("/api/settings/prices").await.json();
        assert!(body.data["el_price_ore_kwh"].is_null());
        assert_eq!(body.data["effective"]["elec_sek_kwh"].as_f64().unwrap(), 2.75);

        let created: ApiResponse<serde_json::Value> =
            server.post("/api/cars").json(&ev_request()).await.json();
        let energy_before = created.data["energy_cost_year"].as_f64().unwrap();

        let response = server
            .put("/api/settings/prices")
            .json(&serde_json::json!({ "el_price_ore_kwh": 500 }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["el_price_ore_kwh"].as_i64().unwrap(), 500);
        assert_eq!(body.data["effective"]["elec_sek_kwh"].as_f64().unwrap(), 5.5);

        // A second update only touches the provided field.
        let body: ApiResponse<serde_json::Value> = server
            .put("/api/settings/prices")
            .json(&serde_json::json!({ "yearly_km": 25_000 }))
            .await
            .json();
        assert_eq!(body.data["el_price_ore_kwh"].as_i64().unwrap(), 500);
        assert_eq!(body.data["yearly_km"].as_i64().unwrap(), 25_000);

        // The cached car reports were invalidated and recomputed.
        let cars: ApiResponse<Vec<serde_json::Value>> = server.get("/api/cars").await.json();
        let energy_after = cars.data[0]["energy_cost_year"].as_f64().unwrap();
        assert!(energy_after > energy_before);
    }
}
