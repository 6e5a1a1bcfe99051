//! Property-based tests for the sizing engine.
//!
//! These tests check that:
//! 1. Tank geometry respects the corner-radius clamp and curvature bounds
//! 2. Biofilter container height grows with every dimension that feeds it
//! 3. The combined liner sheet is the smaller layout and covers both liners
//! 4. Stocking does not move inside the sufficiency dead band
//! 5. Display-unit conversions round trip

use proptest::prelude::*;

use iavs_core::calculations::biofilter::BiofilterDimensions;
use iavs_core::calculations::liner::{combine_sheets, LinerDimensions, SheetLayout};
use iavs_core::calculations::risk::DesignEfficiency;
use iavs_core::calculations::stocking::{self, StockingInput};
use iavs_core::calculations::summary::{calculate, DesignInput};
use iavs_core::calculations::tank::{self, TankDimensions};
use iavs_core::units::Unit;

fn length_mm() -> impl Strategy<Value = f64> {
    (1u32..20_000).prop_map(|x| x as f64)
}

fn tank_strategy() -> impl Strategy<Value = TankDimensions> {
    (length_mm(), length_mm(), 0u32..5_000, 0u32..10_000, 0u32..=100).prop_map(
        |(length, width, depth, corner_radius, curve_depth)| TankDimensions {
            length,
            width,
            depth: depth as f64,
            corner_radius: corner_radius as f64,
            curve_depth: curve_depth as f64,
        },
    )
}

fn biofilter_strategy() -> impl Strategy<Value = BiofilterDimensions> {
    (length_mm(), length_mm(), 0u32..1_000, 0u32..500, 0u32..=10).prop_map(
        |(width, length, shallow_depth, freeboard, slope)| BiofilterDimensions {
            width,
            length,
            shallow_depth: shallow_depth as f64,
            freeboard: freeboard as f64,
            slope: slope as f64,
        },
    )
}

fn sheet_strategy() -> impl Strategy<Value = LinerDimensions> {
    (length_mm(), length_mm()).prop_map(|(length_mm, width_mm)| LinerDimensions { length_mm, width_mm })
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    prop_oneof![Just(Unit::M), Just(Unit::Cm), Just(Unit::In), Just(Unit::Ft)]
}

const FULL_EFFICIENCY: DesignEfficiency = DesignEfficiency {
    bottom_profile: 1.0,
    corner_radius: 1.0,
    total: 1.0,
};

proptest! {
    #[test]
    fn square_corners_give_rectangle_area(tank in tank_strategy()) {
        let tank = TankDimensions { corner_radius: 0.0, ..tank };
        let result = tank::calculate(&tank);
        let expected = (tank.length / 1000.0) * (tank.width / 1000.0);
        prop_assert!((result.top_surface_area_m2 - expected).abs() <= expected * 1e-12);
    }

    #[test]
    fn effective_radius_fits_footprint(tank in tank_strategy()) {
        let result = tank::calculate(&tank);
        prop_assert!(result.effective_corner_radius_mm <= tank.shortest_side_mm() / 2.0);
        prop_assert!(result.effective_corner_radius_mm >= 0.0);
        prop_assert!(result.top_surface_area_m2 >= 0.0);
    }

    #[test]
    fn curved_bottom_never_adds_water(tank in tank_strategy()) {
        let flat = tank::calculate(&TankDimensions { curve_depth: 0.0, ..tank });
        let curved = tank::calculate(&TankDimensions { curve_depth: 100.0, ..tank });
        prop_assert!(flat.volume_liters >= curved.volume_liters);
    }

    #[test]
    fn container_height_is_monotone(
        bio in biofilter_strategy(),
        extra in 1u32..1_000,
    ) {
        let base = bio.total_container_height_mm();
        let extra = extra as f64;
        let steeper = BiofilterDimensions { slope: bio.slope + 1.0, ..bio };
        let longer = BiofilterDimensions { length: bio.length + extra, ..bio };
        let deeper = BiofilterDimensions { shallow_depth: bio.shallow_depth + extra, ..bio };
        let taller = BiofilterDimensions { freeboard: bio.freeboard + extra, ..bio };

        let steeper_height = steeper.total_container_height_mm();
        let longer_height = longer.total_container_height_mm();
        let deeper_height = deeper.total_container_height_mm();
        let taller_height = taller.total_container_height_mm();
        prop_assert!(steeper_height >= base);
        prop_assert!(longer_height >= base);
        prop_assert!(deeper_height > base);
        prop_assert!(taller_height > base);
    }

    #[test]
    fn combined_sheet_is_smaller_layout(a in sheet_strategy(), b in sheet_strategy()) {
        let sheet = combine_sheets(&a, &b);
        let side = a.length_mm.max(b.length_mm) * (a.width_mm + b.width_mm);
        let stacked = (a.length_mm + b.length_mm) * a.width_mm.max(b.width_mm);
        let area = sheet.length_mm * sheet.width_mm;

        prop_assert_eq!(area, side.min(stacked));
        if side == stacked {
            prop_assert_eq!(sheet.layout, SheetLayout::Stacked);
        }
        // one sheet that holds both can never be smaller than the two together
        let separate = a.length_mm * a.width_mm + b.length_mm * b.width_mm;
        prop_assert!(area >= separate * (1.0 - 1e-12));
    }

    #[test]
    fn dead_band_keeps_base_rate(volume in 500u32..50_000, ratio_permille in 980u32..=1000) {
        let volume = volume as f64;
        let ideal = volume / 1000.0 * 6.0;
        let area = ideal * ratio_permille as f64 / 1000.0;
        let result = stocking::calculate(&StockingInput {
            tank_volume_liters: volume,
            biofilter_surface_area_m2: area,
            efficiency: FULL_EFFICIENCY,
        });
        // 0.98 itself may land a hair below the threshold in floating point
        if result.sufficiency_ratio >= 0.98 {
            prop_assert_eq!(result.stocking_multiplier, 1.0);
            prop_assert!(result.adjustment_message.is_empty());
        }
    }

    #[test]
    fn stocking_grows_with_biofilter(volume in 500u32..50_000, area in 1u32..400) {
        let input = |area: f64| StockingInput {
            tank_volume_liters: volume as f64,
            biofilter_surface_area_m2: area,
            efficiency: FULL_EFFICIENCY,
        };
        let smaller = stocking::calculate(&input(area as f64));
        let larger = stocking::calculate(&input(area as f64 + 1.0));
        prop_assert!(larger.final_multiplier >= smaller.final_multiplier);
        prop_assert!(smaller.min_stock <= smaller.max_stock);
    }

    #[test]
    fn unit_round_trip(unit in unit_strategy(), value in 0.001f64..1_000_000.0) {
        let back = unit.from_mm(unit.to_mm(value));
        prop_assert!((back - value).abs() <= value * 1e-9);
    }

    #[test]
    fn mm_round_trip(unit in unit_strategy(), mm in 0.001f64..100_000_000.0) {
        let back = unit.to_mm(unit.from_mm(mm));
        prop_assert!((back - mm).abs() <= mm * 1e-9);
    }

    #[test]
    fn summary_is_total(tank in tank_strategy(), bio in biofilter_strategy(), unit in unit_strategy()) {
        let summary = calculate(&DesignInput { tank, biofilter: bio, unit, ..DesignInput::default() });
        prop_assert!(summary.tank.volume_liters.is_finite());
        prop_assert!(summary.pump.flow.max_lph >= summary.pump.flow.min_lph);
        prop_assert!(summary.liners.combined.area_m2() >= summary.liners.tank.area_m2());
    }
}
