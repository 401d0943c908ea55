//! Annual and monthly energy/fuel spend for a car under the current
//! price settings. Missing consumption figures contribute zero cost;
//! they are never an error.

use common::PriceSnapshot;
use model::entities::car::{self, VehicleType};

/// Commuting days per month assumed for the PHEV electric share.
const COMMUTE_DAYS_PER_MONTH: f64 = 22.0;
/// Electric range assumed for a PHEV when battery or consumption data
/// is missing.
const ASSUMED_PHEV_EV_RANGE_KM: f64 = 40.0;
/// Electric share assumed for a PHEV when yearly distance is zero.
const DEFAULT_PHEV_EV_SHARE: f64 = 0.6;

/// Energy or fuel cost in SEK per year.
///
/// EV runs on electricity only, Diesel/Bensin on liquid fuel only. A PHEV
/// is blended: the commute distance that fits within the car's electric
/// range is driven on electricity, the rest on petrol.
pub fn annual_energy_cost(car: &car::Model, prices: &PriceSnapshot) -> f64 {
    let km = f64::from(prices.yearly_km);
    let kwh100 = car.consumption_kwh_per_100km.unwrap_or(0.0);
    let l100 = car.consumption_l_per_100km.unwrap_or(0.0);

    match car.vehicle_type {
        VehicleType::Ev => (km / 100.0) * kwh100 * prices.elec_sek_kwh,
        VehicleType::Diesel => (km / 100.0) * l100 * prices.diesel_sek_litre,
        VehicleType::Bensin => (km / 100.0) * l100 * prices.bensin_sek_litre,
        VehicleType::Phev => {
            let batt_kwh = car.battery_capacity_kwh.unwrap_or(0.0);
            let ev_range_km = if batt_kwh > 0.0 && kwh100 > 0.0 {
                100.0 * batt_kwh / kwh100
            } else {
                ASSUMED_PHEV_EV_RANGE_KM
            };
            let ev_km_per_day = f64::from(prices.daily_commute_km).min(ev_range_km);
            let ev_share = if km > 0.0 {
                (ev_km_per_day * COMMUTE_DAYS_PER_MONTH / km).clamp(0.0, 1.0)
            } else {
                DEFAULT_PHEV_EV_SHARE
            };
            let ev_part = ev_share * kwh100 * prices.elec_sek_kwh;
            let ice_part = (1.0 - ev_share) * l100 * prices.bensin_sek_litre;
            (km / 100.0) * (ev_part + ice_part)
        }
    }
}

/// Energy or fuel cost in SEK per month.
pub fn monthly_energy_cost(car: &car::Model, prices: &PriceSnapshot) -> f64 {
    annual_energy_cost(car, prices) / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_car(vehicle_type: VehicleType) -> car::Model {
        car::Model {
            id: 1,
            model: "Testbil".to_string(),
            year: 2022,
            vehicle_type,
            consumption_kwh_per_100km: None,
            consumption_l_per_100km: None,
            battery_capacity_kwh: None,
            estimated_purchase_price: 300_000.0,
            summer_tires_price: 0.0,
            winter_tires_price: 0.0,
            tire_replacement_interval_years: None,
            full_insurance_year: None,
            half_insurance_year: None,
            car_tax_year: None,
            repairs_year: None,
            expected_value_after_3y: None,
            expected_value_after_5y: None,
            expected_value_after_8y: None,
            tco_3_years: None,
            tco_5_years: None,
            tco_8_years: None,
        }
    }

    #[test]
    fn ev_cost_matches_hand_calculation() {
        let mut car = test_car(VehicleType::Ev);
        car.consumption_kwh_per_100km = Some(18.0);
        let prices = PriceSnapshot::default();
        // 18000/100 * 18 kWh * 2.75 SEK = 8910 SEK/year
        let yearly = annual_energy_cost(&car, &prices);
        assert!((yearly - 8910.0).abs() < 1e-6);
        assert!((monthly_energy_cost(&car, &prices) - 8910.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn missing_consumption_costs_nothing() {
        let prices = PriceSnapshot::default();
        assert_eq!(annual_energy_cost(&test_car(VehicleType::Ev), &prices), 0.0);
        assert_eq!(annual_energy_cost(&test_car(VehicleType::Diesel), &prices), 0.0);
    }

    #[test]
    fn higher_consumption_costs_more() {
        let prices = PriceSnapshot::default();
        for vt in [VehicleType::Ev, VehicleType::Diesel, VehicleType::Bensin] {
            let mut low = test_car(vt);
            let mut high = test_car(vt);
            match vt {
                VehicleType::Ev => {
                    low.consumption_kwh_per_100km = Some(15.0);
                    high.consumption_kwh_per_100km = Some(22.0);
                }
                _ => {
                    low.consumption_l_per_100km = Some(5.0);
                    high.consumption_l_per_100km = Some(8.0);
                }
            }
            assert!(annual_energy_cost(&high, &prices) > annual_energy_cost(&low, &prices));
        }
    }

    #[test]
    fn phev_cost_sits_between_pure_ev_and_pure_ice() {
        let prices = PriceSnapshot::default();

        let mut phev = test_car(VehicleType::Phev);
        phev.consumption_kwh_per_100km = Some(20.0);
        phev.consumption_l_per_100km = Some(7.0);
        phev.battery_capacity_kwh = Some(12.0);

        let mut ev = test_car(VehicleType::Ev);
        ev.consumption_kwh_per_100km = Some(20.0);

        let mut ice = test_car(VehicleType::Bensin);
        ice.consumption_l_per_100km = Some(7.0);

        let blended = annual_energy_cost(&phev, &prices);
        let pure_ev = annual_energy_cost(&ev, &prices);
        let pure_ice = annual_energy_cost(&ice, &prices);

        let lo = pure_ev.min(pure_ice);
        let hi = pure_ev.max(pure_ice);
        assert!(blended >= lo && blended <= hi, "{blended} not in [{lo}, {hi}]");
    }

    #[test]
    fn phev_range_is_derived_from_battery_when_available() {
        let prices = PriceSnapshot::default();

        // 12 kWh / 20 kWh per 100 km -> 60 km electric range, covers the
        // whole 30 km commute.
        let mut long_range = test_car(VehicleType::Phev);
        long_range.consumption_kwh_per_100km = Some(20.0);
        long_range.consumption_l_per_100km = Some(7.0);
        long_range.battery_capacity_kwh = Some(12.0);

        // 4 kWh battery -> 20 km electric range, commute only partly covered,
        // so a larger share burns petrol (which is pricier per km here).
        let mut short_range = long_range.clone();
        short_range.battery_capacity_kwh = Some(4.0);

        assert!(
            annual_energy_cost(&short_range, &prices)
                > annual_energy_cost(&long_range, &prices)
        );
    }
}
