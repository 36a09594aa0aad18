use citygrid_core::{
    GeneratorError, GeneratorErrorCode, GraphIntegrityError, GraphIntegrityErrorCode,
    NamePoolError, Region, TransportKind, VertexId,
};
use rstest::rstest;

#[rstest]
#[case(
    GeneratorError::InvalidDimensions { rows: 0, columns: 3 },
    GeneratorErrorCode::InvalidDimensions,
    "CITYGRID_INVALID_DIMENSIONS",
)]
#[case(
    GeneratorError::CapacityOverflow { rows: usize::MAX, columns: 2, properties_per_side: 5 },
    GeneratorErrorCode::CapacityOverflow,
    "CITYGRID_CAPACITY_OVERFLOW",
)]
#[case(
    GeneratorError::InvalidParameter {
        parameter: "street_length",
        value: -1.0,
        reason: "must be finite and positive",
    },
    GeneratorErrorCode::InvalidParameter,
    "CITYGRID_INVALID_PARAMETER",
)]
#[case(
    GeneratorError::ZeroPropertiesPerSide,
    GeneratorErrorCode::ZeroPropertiesPerSide,
    "CITYGRID_ZERO_PROPERTIES_PER_SIDE",
)]
#[case(
    GeneratorError::InvalidPropertyWeights {
        region: Region::South,
        reason: "all weights are zero".to_owned(),
    },
    GeneratorErrorCode::InvalidPropertyWeights,
    "CITYGRID_INVALID_PROPERTY_WEIGHTS",
)]
#[case(GeneratorError::MissingInput, GeneratorErrorCode::MissingInput, "CITYGRID_MISSING_INPUT")]
#[case(
    GeneratorError::NameExhausted { issued: 3 },
    GeneratorErrorCode::NameExhausted,
    "CITYGRID_NAME_EXHAUSTED",
)]
fn returns_expected_generator_code(
    #[case] error: GeneratorError,
    #[case] expected: GeneratorErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
    assert_eq!(expected.to_string(), code);
}

#[rstest]
#[case(
    GraphIntegrityError::DuplicateVertex { id: VertexId::new(0, 0) },
    GraphIntegrityErrorCode::DuplicateVertex,
    "GRAPH_DUPLICATE_VERTEX",
)]
#[case(
    GraphIntegrityError::DanglingEdge {
        from: VertexId::new(0, 0),
        to: VertexId::new(0, 1),
        transport: TransportKind::Taxi,
        missing: VertexId::new(0, 1),
    },
    GraphIntegrityErrorCode::DanglingEdge,
    "GRAPH_DANGLING_EDGE",
)]
#[case(
    GraphIntegrityError::DanglingProperty {
        street: "Rua A".to_owned(),
        number: 4,
        missing: VertexId::new(3, 3),
    },
    GraphIntegrityErrorCode::DanglingProperty,
    "GRAPH_DANGLING_PROPERTY",
)]
#[case(
    GraphIntegrityError::RollupMismatch {
        from: VertexId::new(0, 0),
        to: VertexId::new(0, 1),
        transport: TransportKind::Walk,
        reported: 5,
        actual: 4,
    },
    GraphIntegrityErrorCode::RollupMismatch,
    "GRAPH_ROLLUP_MISMATCH",
)]
fn returns_expected_integrity_code(
    #[case] error: GraphIntegrityError,
    #[case] expected: GraphIntegrityErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
}

#[rstest]
fn pool_exhaustion_converts_to_generator_error() {
    let error = GeneratorError::from(NamePoolError::Exhausted { issued: 9 });
    assert_eq!(error, GeneratorError::NameExhausted { issued: 9 });
    assert_eq!(
        error.to_string(),
        "street name pool exhausted after issuing 9 names"
    );
}

#[rstest]
fn messages_name_the_offending_parameter() {
    let error = GeneratorError::InvalidParameter {
        parameter: "prune_probability",
        value: 1.5,
        reason: "must lie in [0, 1]",
    };
    assert_eq!(
        error.to_string(),
        "parameter `prune_probability` is invalid (got 1.5): must lie in [0, 1]"
    );
}
