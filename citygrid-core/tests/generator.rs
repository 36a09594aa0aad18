//! Tests for the `GridGenerator` assembly pass.

mod common;

use std::collections::{HashMap, HashSet};

use citygrid_core::{
    EXCAVATION_MULTIPLIERS, EdgeCostFields, GeneratorBuilder, GeneratorError, NamePool,
    NamingPolicy, PropertyType, PropertyWeighting, Region, RepairStrategy, TransportKind,
    VertexId,
};
use citygrid_test_support::{fixtures::street_names, tracing::RecordingLayer};
use common::{generate, generator};
use rstest::rstest;
use tracing::Level;

#[rstest]
fn full_two_by_two_grid() {
    let graph = generate(&generator(2, 2, 0.0, 3));
    assert_eq!(graph.nodes().len(), 4);
    assert_eq!(graph.edges().len(), 16);
    assert_eq!(graph.properties().len(), 40);

    let streets: HashSet<(VertexId, VertexId)> = graph
        .edges()
        .iter()
        .map(|edge| {
            let (a, b) = (edge.from(), edge.to());
            if a < b { (a, b) } else { (b, a) }
        })
        .collect();
    assert_eq!(
        streets,
        HashSet::from([
            (VertexId::new(0, 0), VertexId::new(0, 1)),
            (VertexId::new(0, 0), VertexId::new(1, 0)),
            (VertexId::new(0, 1), VertexId::new(1, 1)),
            (VertexId::new(1, 0), VertexId::new(1, 1)),
        ])
    );
    assert!(graph.validate().is_ok());
}

#[rstest]
fn streets_emit_walk_then_taxi_in_both_directions() {
    let graph = generate(&generator(1, 2, 0.0, 0));
    let a = VertexId::new(0, 0);
    let b = VertexId::new(0, 1);
    let shape: Vec<_> = graph
        .edges()
        .iter()
        .map(|edge| (edge.transport(), edge.from(), edge.to()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (TransportKind::Walk, a, b),
            (TransportKind::Walk, b, a),
            (TransportKind::Taxi, a, b),
            (TransportKind::Taxi, b, a),
        ]
    );
}

#[rstest]
fn origin_is_north() {
    let graph = generate(&generator(24, 16, 0.0, 0));
    let origin = graph
        .vertex(VertexId::new(0, 0))
        .expect("unpruned grid keeps the origin");
    assert_eq!(origin.region_label(), Some(Region::North));
    let cep = graph
        .properties()
        .iter()
        .find(|property| property.from() == VertexId::new(0, 0))
        .map(|property| property.region());
    assert_eq!(cep, Some(Region::North));
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(12_345)]
fn identical_seeds_reproduce_the_graph(#[case] seed: u64) {
    let first = generate(&generator(12, 9, 0.3, seed));
    let second = generate(&generator(12, 9, 0.3, seed));
    assert_eq!(first, second);
}

#[rstest]
fn different_seeds_diverge() {
    let first = generate(&generator(12, 9, 0.3, 1));
    let second = generate(&generator(12, 9, 0.3, 2));
    assert_ne!(first, second);
}

#[rstest]
fn edge_costs_follow_mode_formulas() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(8, 8)
        .with_prune_probability(0.3)
        .with_max_speed(10.0)
        .with_non_motorized_speed(2.0)
        .with_taxi_rate(5.0)
        .with_seed(5)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    for edge in graph.edges() {
        match edge.transport() {
            TransportKind::Walk => {
                assert_eq!(edge.max_speed(), 2.0);
                assert_eq!(edge.price_cost(), 0.0);
                assert_eq!(edge.time_cost(), edge.distance() / 2.0);
            }
            TransportKind::Taxi => {
                assert_eq!(edge.max_speed(), 10.0);
                assert_eq!(edge.price_cost(), (edge.distance() / 1000.0) * 5.0);
                assert_eq!(edge.time_cost(), edge.distance() / 10.0);
            }
        }
    }
}

#[rstest]
fn excavation_is_shared_by_the_four_edges_of_a_street() {
    let graph = generate(&generator(6, 6, 0.2, 11));
    for street in graph.edges().chunks(4) {
        let multiplier = street[0]
            .excavation_cost()
            .map(|cost| cost / street[0].distance())
            .expect("excavation costs are on by default");
        assert!(
            EXCAVATION_MULTIPLIERS
                .iter()
                .any(|candidate| (candidate - multiplier).abs() < 1e-9)
        );
        for edge in street {
            assert_eq!(edge.excavation_cost(), street[0].excavation_cost());
        }
    }
}

#[rstest]
fn basic_costs_skip_excavation() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(4, 4)
        .with_prune_probability(0.0)
        .with_edge_cost_fields(EdgeCostFields::Basic)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    assert!(graph.edges().iter().all(|edge| edge.excavation_cost().is_none()));
}

#[rstest]
fn repaired_streets_scale_distance() {
    let graph = generate(&generator(16, 16, 0.5, 99));
    let repaired: Vec<_> = graph
        .edges()
        .iter()
        .filter(|edge| edge.skipped_vertices().is_some_and(|skipped| skipped > 0))
        .collect();
    assert!(!repaired.is_empty(), "half-pruned grid must need repairs");
    for edge in &repaired {
        let skipped = edge.skipped_vertices().expect("streets are axis-aligned");
        assert_eq!(edge.distance(), 200.0 * (skipped + 1) as f64);
    }
}

#[rstest]
fn disabled_repair_only_links_neighbours() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(16, 16)
        .with_prune_probability(0.5)
        .with_repair_strategy(RepairStrategy::Disabled)
        .with_seed(99)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    assert!(!graph.edges().is_empty());
    assert!(
        graph
            .edges()
            .iter()
            .all(|edge| edge.skipped_vertices() == Some(0) && edge.distance() == 200.0)
    );
}

#[rstest]
fn property_numbers_follow_direction_and_origin_column() {
    let graph = generate(&generator(1, 3, 0.0, 4));
    let numbers = |from: VertexId, to: VertexId| {
        let mut numbers: Vec<usize> = graph
            .properties()
            .iter()
            .filter(|property| property.from() == from && property.to() == to)
            .map(|property| property.number())
            .collect();
        numbers.sort_unstable();
        numbers
    };
    let a = VertexId::new(0, 1);
    let b = VertexId::new(0, 2);
    assert_eq!(numbers(a, b), vec![10, 12, 14, 16, 18]);
    assert_eq!(numbers(b, a), vec![21, 23, 25, 27, 29]);
}

#[rstest]
fn both_sides_of_a_street_share_the_anchor_region() {
    // Rows 0..2 are north in an 8-row grid; the street from row 1 to row 2
    // is anchored in the north even though its far end is central.
    let graph = generate(&generator(8, 2, 0.0, 6));
    let top = VertexId::new(1, 0);
    let bottom = VertexId::new(2, 0);
    let regions: HashSet<Region> = graph
        .properties()
        .iter()
        .filter(|property| {
            (property.from(), property.to()) == (top, bottom)
                || (property.from(), property.to()) == (bottom, top)
        })
        .map(|property| property.region())
        .collect();
    assert_eq!(regions, HashSet::from([Region::North]));
}

#[rstest]
fn rollups_sum_to_properties_per_side() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(6, 6)
        .with_properties_per_side(7)
        .with_seed(8)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    assert!(graph.edges().iter().all(|edge| edge.property_counts().total() == 7));
    assert_eq!(graph.properties().len(), graph.edges().len() / 2 * 7);
    assert!(graph.validate().is_ok());
}

#[rstest]
fn weights_can_force_a_single_type() {
    let mut builder = GeneratorBuilder::new()
        .with_dimensions(8, 8)
        .with_seed(2);
    for region in Region::ALL {
        builder = builder.with_property_weights(region, [0.0, 0.0, 0.0, 1.0]);
    }
    let graph = generate(&builder.build().expect("configuration is valid"));
    assert!(
        graph
            .properties()
            .iter()
            .all(|property| property.property_type() == PropertyType::Touristic)
    );
}

#[rstest]
fn uniform_weighting_ignores_regions() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(12, 12)
        .with_prune_probability(0.0)
        .with_property_weighting(PropertyWeighting::Uniform)
        .with_seed(31)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    let mut per_type: HashMap<PropertyType, usize> = HashMap::new();
    for property in graph.properties() {
        *per_type.entry(property.property_type()).or_default() += 1;
    }
    let total = graph.properties().len();
    for property_type in PropertyType::ALL {
        let share = per_type.get(&property_type).copied().unwrap_or_default() as f64 / total as f64;
        assert!((0.2..0.3).contains(&share), "{property_type} share {share}");
    }
}

#[rstest]
fn shared_naming_needs_at_most_rows_plus_columns() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(10, 7)
        .with_naming_policy(NamingPolicy::SharedPerAxis)
        .with_seed(13)
        .build()
        .expect("configuration is valid");
    let mut pool = NamePool::new(street_names(40));
    let graph = generator.generate(&mut pool).expect("40 names are enough");
    assert!(pool.issued_count() <= 10 + 7, "issued {}", pool.issued_count());
    assert_eq!(pool.remaining(), 40 - pool.issued_count());
    assert!(graph.validate().is_ok());
}

#[rstest]
fn unique_naming_gives_every_street_its_own_name() {
    let graph = generate(&generator(9, 9, 0.3, 21));
    let mut names_per_street: HashMap<&str, HashSet<(VertexId, VertexId)>> = HashMap::new();
    for property in graph.properties() {
        let (a, b) = (property.from(), property.to());
        let street = if a < b { (a, b) } else { (b, a) };
        names_per_street.entry(property.street()).or_default().insert(street);
    }
    assert!(names_per_street.values().all(|streets| streets.len() == 1));
    assert_eq!(names_per_street.len(), graph.edges().len() / 4);
}

#[rstest]
fn name_exhaustion_is_fatal() {
    let err = generator(4, 4, 0.0, 0)
        .generate_from_names(street_names(5))
        .expect_err("a 4x4 grid has 24 streets");
    assert_eq!(err, GeneratorError::NameExhausted { issued: 5 });
}

#[rstest]
fn fully_pruned_grid_is_empty() {
    let graph = generate(&generator(5, 5, 1.0, 0));
    assert!(graph.nodes().is_empty());
    assert!(graph.edges().is_empty());
    assert!(graph.properties().is_empty());
}

#[rstest]
fn unlabelled_nodes_omit_region() {
    let generator = GeneratorBuilder::new()
        .with_dimensions(3, 3)
        .with_region_labels(false)
        .build()
        .expect("configuration is valid");
    let graph = generate(&generator);
    assert!(graph.nodes().iter().all(|node| node.region_label().is_none()));
}

#[rstest]
fn generation_is_instrumented() {
    let layer = RecordingLayer::default();
    let graph = layer.record_during(|| generate(&generator(4, 4, 0.0, 1)));

    let span = layer.span("core.generate").expect("generation span recorded");
    assert_eq!(span.fields.get("rows").map(String::as_str), Some("4"));
    assert_eq!(span.fields.get("seed").map(String::as_str), Some("1"));

    let summary = layer
        .events_at(Level::INFO)
        .into_iter()
        .find(|event| event.message.as_deref() == Some("generated city graph"))
        .expect("summary event recorded");
    let edges = graph.edges().len().to_string();
    assert_eq!(summary.fields.get("edges"), Some(&edges));
    assert_eq!(summary.fields.get("streets").map(String::as_str), Some("24"));

    for property_type in PropertyType::ALL {
        let expected = graph
            .properties()
            .iter()
            .filter(|property| property.property_type() == property_type)
            .count()
            .to_string();
        assert_eq!(
            summary.fields.get(property_type.as_str()),
            Some(&expected),
            "{property_type} tally"
        );
    }
}

#[rstest]
fn exhaustion_is_recorded_on_the_span() {
    let layer = RecordingLayer::default();
    let result = layer.record_during(|| generator(2, 2, 0.0, 0).generate_from_names(["Rua A"]));
    assert!(result.is_err());
    let errors: Vec<_> = layer
        .events_at(Level::ERROR)
        .into_iter()
        .filter(|event| event.fields.get("error").is_some_and(|error| error.contains("exhausted")))
        .collect();
    assert_eq!(errors.len(), 1);
}
