//! Sample gear offered on an empty gear locker.

use crate::models::{GearDraft, GearType};
use crate::units::WeightUnit;

struct Sample {
    brand: &'static str,
    model: &'static str,
    weight_oz: f64,
    description: &'static str,
    slug: &'static str,
    worn: bool,
    consumable: bool,
    gear_type: GearType,
}

const SAMPLES: [Sample; 14] = [
    Sample {
        brand: "Hyperlite",
        model: "Southwest 2400",
        weight_oz: 33.2,
        description: "Lightweight backpack with ample storage space for multi-day trips.",
        slug: "hyperlite-southwest-2400",
        worn: false,
        consumable: false,
        gear_type: GearType::Backpack,
    },
    Sample {
        brand: "Patagonia",
        model: "R1 Pullover",
        weight_oz: 12.4,
        description: "Midweight fleece pullover suitable for layering in various weather conditions.",
        slug: "patagonia-r1-pullover",
        worn: true,
        consumable: false,
        gear_type: GearType::Clothing,
    },
    Sample {
        brand: "Nemo",
        model: "Hornet 2P",
        weight_oz: 56.3,
        description: "Spacious tent designed for two people, with easy setup and durable materials.",
        slug: "nemo-hornet-2p",
        worn: false,
        consumable: false,
        gear_type: GearType::Tent,
    },
    Sample {
        brand: "Therm-a-Rest",
        model: "NeoAir XLite",
        weight_oz: 15.8,
        description: "Ultralight sleeping pad with excellent insulation for cold nights.",
        slug: "thermarest-neoair-xlite",
        worn: true,
        consumable: false,
        gear_type: GearType::Sleep,
    },
    Sample {
        brand: "Garmin",
        model: "inReach Mini",
        weight_oz: 7.5,
        description: "Compact satellite communicator for sending and receiving messages in remote areas.",
        slug: "garmin-inreach-mini",
        worn: false,
        consumable: false,
        gear_type: GearType::Electronic,
    },
    Sample {
        brand: "MSR",
        model: "PocketRocket 2",
        weight_oz: 2.6,
        description: "Portable and efficient backpacking stove for cooking meals on the trail.",
        slug: "msr-pocketrocket-2",
        worn: true,
        consumable: false,
        gear_type: GearType::Cooking,
    },
    Sample {
        brand: "Swiss",
        model: "Army Knife",
        weight_oz: 0.7,
        description: "Multi tool for survival",
        slug: "swiss-army-knife",
        worn: false,
        consumable: false,
        gear_type: GearType::Safety,
    },
    Sample {
        brand: "Platypus",
        model: "GravityWorks Water Filter",
        weight_oz: 11.8,
        description: "High-capacity water filtration system for purifying water from natural sources while camping or backpacking.",
        slug: "platypus-gravityworks-water-filter",
        worn: false,
        consumable: false,
        gear_type: GearType::Water,
    },
    Sample {
        brand: "Black Diamond",
        model: "Spot Headlamp",
        weight_oz: 3.2,
        description: "Compact and versatile headlamp with adjustable brightness levels, ideal for nighttime activities.",
        slug: "black-diamond-spot-headlamp",
        worn: true,
        consumable: false,
        gear_type: GearType::Lighting,
    },
    Sample {
        brand: "Petzl",
        model: "Grigri+",
        weight_oz: 8.9,
        description: "Assisted braking belay device for rock climbing, providing added safety during descents.",
        slug: "petzl-grigri-plus",
        worn: false,
        consumable: false,
        gear_type: GearType::Climbing,
    },
    Sample {
        brand: "Salomon",
        model: "X Ultra 3 GTX",
        weight_oz: 16.4,
        description: "Waterproof hiking shoes with excellent traction and support for long-distance hikes.",
        slug: "salomon-x-ultra-3-gtx",
        worn: true,
        consumable: false,
        gear_type: GearType::Footwear,
    },
    Sample {
        brand: "Leatherman",
        model: "Wave+",
        weight_oz: 8.6,
        description: "Versatile multitool with a variety of useful functions, including pliers, knives, and screwdrivers.",
        slug: "leatherman-wave-plus",
        worn: false,
        consumable: false,
        gear_type: GearType::Tools,
    },
    Sample {
        brand: "Sea to Summit",
        model: "Pocket Trowel",
        weight_oz: 3.1,
        description: "Compact and lightweight trowel for digging cat holes while camping.",
        slug: "sea-to-summit-pocket-trowel",
        worn: false,
        consumable: false,
        gear_type: GearType::Hygiene,
    },
    Sample {
        brand: "GSI Outdoors",
        model: "Infinity Backpacker Mug",
        weight_oz: 2.0,
        description: "Durable and lightweight mug for enjoying hot beverages while on the trail.",
        slug: "gsi-outdoors-infinity-backpacker-mug",
        worn: false,
        consumable: true,
        gear_type: GearType::Fun,
    },
];

/// Drafts for the sample gear, weights in ounces.
pub fn sample_gear() -> Vec<GearDraft> {
    SAMPLES
        .iter()
        .map(|s| GearDraft {
            brand: s.brand.to_string(),
            model: s.model.to_string(),
            weight: s.weight_oz,
            weight_unit: Some(WeightUnit::Ounces),
            description: s.description.to_string(),
            url: format!("https://example.com/{}", s.slug),
            worn: s.worn,
            consumable: s.consumable,
            gear_type: s.gear_type,
            ..GearDraft::default()
        })
        .collect()
}
