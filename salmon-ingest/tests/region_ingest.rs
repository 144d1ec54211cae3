//! End-to-end behaviour of the region ingestion run.

use rstest::{fixture, rstest};
use rusqlite::Connection;

use salmon_ingest::test_support::MemorySource;
use salmon_ingest::{
    AttributeValue, FeatureSource, FieldMapping, IngestError, IngestOptions, MappingError,
    ResolvedFields, ingest_regions,
};
use salmon_schema::{RegionKind, SqliteRegionStore};

const FRASER_BOUNDARY: &str = "POLYGON((0 0,1 0,1 1,0 1,0 0))";
const ISLANDS_BOUNDARY: &str = "MULTIPOLYGON(((0 0,1 0,1 1,0 1,0 0)))";

#[fixture]
fn store() -> SqliteRegionStore {
    let connection = Connection::open_in_memory().expect("create in-memory database");
    SqliteRegionStore::from_connection(connection).expect("initialise store")
}

#[fixture]
fn mapping() -> FieldMapping {
    FieldMapping {
        name: Some("NAME".into()),
        code: Some("CODE".into()),
        outlet_lat: Some("LAT".into()),
        outlet_lon: Some("LON".into()),
    }
}

fn fraser_source() -> MemorySource {
    MemorySource::new(["NAME", "CODE", "LAT", "LON"]).with_feature(
        [
            ("NAME", AttributeValue::Text("Fraser".into())),
            ("CODE", AttributeValue::Text("FR01".into())),
            ("LAT", AttributeValue::Number(49.1)),
            ("LON", AttributeValue::Number(-123.1)),
        ],
        FRASER_BOUNDARY,
    )
}

fn resolve(mapping: &FieldMapping, source: &MemorySource) -> ResolvedFields {
    mapping
        .resolve(source.field_names())
        .expect("resolve mapping")
}

fn watershed_run() -> IngestOptions {
    IngestOptions {
        kind: RegionKind::Watershed,
        dry_run: false,
    }
}

fn region_rows(store: &SqliteRegionStore) -> i64 {
    store
        .connection()
        .query_row("SELECT COUNT(*) FROM region", [], |row| row.get(0))
        .expect("count region rows")
}

#[rstest]
fn single_polygon_feature_becomes_one_region_row(
    mut store: SqliteRegionStore,
    mapping: FieldMapping,
) {
    let mut source = fraser_source();
    let fields = resolve(&mapping, &source);
    let report = ingest_regions(&mut source, &fields, &mut store, watershed_run())
        .expect("run should succeed");

    assert_eq!(report.regions_added, 1);
    assert_eq!(report.multipolygon_count, 0);
    assert_eq!(
        report.summary(),
        "1 watersheds added, 0 watersheds were multipolygons and could not be added"
    );

    let (name, code, kind, boundary, outlet): (String, String, String, String, String) = store
        .connection()
        .query_row(
            "SELECT name, code, kind, boundary, outlet FROM region",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .expect("read the ingested row");
    assert_eq!(name, "Fraser");
    assert_eq!(code, "FR01");
    assert_eq!(kind, "watershed");
    assert_eq!(boundary, format!("SRID=4326;{FRASER_BOUNDARY}"));
    assert_eq!(outlet, "SRID=4326;POINT(-123.1 49.1)");
}

#[rstest]
fn mapping_missing_code_aborts_before_any_feature(
    store: SqliteRegionStore,
    mapping: FieldMapping,
) {
    let broken = FieldMapping {
        code: None,
        ..mapping
    };
    let error = broken
        .resolve(fraser_source().field_names())
        .expect_err("missing code should abort the run");

    assert!(matches!(error, MappingError::MissingField { field: "code" }));
    assert_eq!(region_rows(&store), 0);
}

#[rstest]
fn mapped_attribute_absent_from_source_aborts(store: SqliteRegionStore) {
    let mapping = FieldMapping {
        name: Some("NAME".into()),
        code: Some("NO_SUCH".into()),
        outlet_lat: None,
        outlet_lon: None,
    };
    let error = mapping
        .resolve(fraser_source().field_names())
        .expect_err("unknown attribute should abort the run");

    assert!(matches!(
        error,
        MappingError::AttributeNotInSource { attribute } if attribute == "NO_SUCH"
    ));
    assert_eq!(region_rows(&store), 0);
}

#[rstest]
fn multipolygon_feature_is_rejected_not_fatal(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let mut source = MemorySource::new(["NAME", "CODE", "LAT", "LON"])
        .with_feature(
            [
                ("NAME", AttributeValue::Text("Gulf Islands".into())),
                ("CODE", AttributeValue::Text("GI01".into())),
                ("LAT", AttributeValue::Empty),
                ("LON", AttributeValue::Empty),
            ],
            ISLANDS_BOUNDARY,
        )
        .with_feature(
            [
                ("NAME", AttributeValue::Text("Fraser".into())),
                ("CODE", AttributeValue::Text("FR01".into())),
                ("LAT", AttributeValue::Number(49.1)),
                ("LON", AttributeValue::Number(-123.1)),
            ],
            FRASER_BOUNDARY,
        );

    let fields = resolve(&mapping, &source);
    let report = ingest_regions(&mut source, &fields, &mut store, watershed_run())
        .expect("rejections do not abort the run");

    assert_eq!(report.regions_added, 1);
    assert_eq!(report.multipolygon_count, 1);
    assert_eq!(report.rejected_regions, vec!["Gulf Islands"]);
    assert_eq!(region_rows(&store), 1);
}

#[rstest]
fn multipolygon_only_source_adds_nothing(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let mut source = MemorySource::new(["NAME", "CODE", "LAT", "LON"]).with_feature(
        [
            ("NAME", AttributeValue::Text("Gulf Islands".into())),
            ("CODE", AttributeValue::Text("GI01".into())),
            ("LAT", AttributeValue::Empty),
            ("LON", AttributeValue::Empty),
        ],
        ISLANDS_BOUNDARY,
    );

    let fields = resolve(&mapping, &source);
    let report = ingest_regions(&mut source, &fields, &mut store, watershed_run())
        .expect("rejections do not abort the run");

    assert_eq!(region_rows(&store), 0);
    assert_eq!(
        report.summary(),
        "0 watersheds added, 1 watersheds were multipolygons and could not be added"
    );
}

#[rstest]
fn dry_run_counts_without_writing(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let options = IngestOptions {
        kind: RegionKind::Watershed,
        dry_run: true,
    };
    let mut source = fraser_source();
    let fields = resolve(&mapping, &source);
    let report =
        ingest_regions(&mut source, &fields, &mut store, options).expect("dry run should succeed");

    assert_eq!(report.regions_added, 1);
    assert_eq!(region_rows(&store), 0);
    assert_eq!(
        report.summary(),
        "DRY RUN: 1 potential watersheds to add found, \
         0 watersheds cannot be added because they were multipolygons"
    );
}

#[rstest]
fn second_run_updates_in_place(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let mut source = fraser_source();
    let fields = resolve(&mapping, &source);
    ingest_regions(&mut source, &fields, &mut store, watershed_run()).expect("first run");

    let mut renamed = MemorySource::new(["NAME", "CODE", "LAT", "LON"]).with_feature(
        [
            ("NAME", AttributeValue::Text("Fraser River".into())),
            ("CODE", AttributeValue::Text("FR01".into())),
            ("LAT", AttributeValue::Number(49.2)),
            ("LON", AttributeValue::Number(-123.2)),
        ],
        FRASER_BOUNDARY,
    );
    let report =
        ingest_regions(&mut renamed, &fields, &mut store, watershed_run()).expect("second run");

    assert_eq!(report.regions_added, 0);
    assert_eq!(report.regions_updated, 1);
    assert_eq!(region_rows(&store), 1);

    let (name, outlet): (String, String) = store
        .connection()
        .query_row("SELECT name, outlet FROM region WHERE code = 'FR01'", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("read updated row");
    assert_eq!(name, "Fraser River");
    assert_eq!(outlet, "SRID=4326;POINT(-123.2 49.2)");
}

#[rstest]
fn empty_latitude_forces_the_empty_outlet(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let mut source = MemorySource::new(["NAME", "CODE", "LAT", "LON"]).with_feature(
        [
            ("NAME", AttributeValue::Text("Fraser".into())),
            ("CODE", AttributeValue::Text("FR01".into())),
            ("LAT", AttributeValue::Empty),
            ("LON", AttributeValue::Number(-123.1)),
        ],
        FRASER_BOUNDARY,
    );
    let fields = resolve(&mapping, &source);
    ingest_regions(&mut source, &fields, &mut store, watershed_run()).expect("run");

    let outlet: String = store
        .connection()
        .query_row("SELECT outlet FROM region WHERE code = 'FR01'", [], |row| {
            row.get(0)
        })
        .expect("read outlet");
    assert_eq!(outlet, "SRID=4326;POINT EMPTY");
}

#[rstest]
fn unmapped_outlet_fields_omit_outlets_entirely(mut store: SqliteRegionStore) {
    let mapping = FieldMapping {
        name: Some("NAME".into()),
        code: Some("CODE".into()),
        outlet_lat: Some("LAT".into()),
        outlet_lon: None,
    };
    let mut source = fraser_source();
    let fields = resolve(&mapping, &source);
    ingest_regions(&mut source, &fields, &mut store, watershed_run()).expect("run");

    let outlet: Option<String> = store
        .connection()
        .query_row("SELECT outlet FROM region WHERE code = 'FR01'", [], |row| {
            row.get(0)
        })
        .expect("read outlet");
    assert_eq!(outlet, None);
}

#[rstest]
fn conservation_units_land_in_their_own_table(mut store: SqliteRegionStore, mapping: FieldMapping) {
    let options = IngestOptions {
        kind: RegionKind::ConservationUnit,
        dry_run: false,
    };
    let mut source = fraser_source();
    let fields = resolve(&mapping, &source);
    let report = ingest_regions(&mut source, &fields, &mut store, options).expect("run");

    assert_eq!(report.regions_added, 1);
    assert_eq!(region_rows(&store), 0);
    let cu_rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM conservation_unit", [], |row| {
            row.get(0)
        })
        .expect("count conservation units");
    assert_eq!(cu_rows, 1);
}

#[rstest]
fn attribute_missing_from_a_feature_aborts_mid_run(
    mut store: SqliteRegionStore,
    mapping: FieldMapping,
) {
    // The field list declares NAME but the second feature omits it; rows
    // committed before the failure stay committed.
    let mut source = MemorySource::new(["NAME", "CODE", "LAT", "LON"])
        .with_feature(
            [
                ("NAME", AttributeValue::Text("Fraser".into())),
                ("CODE", AttributeValue::Text("FR01".into())),
                ("LAT", AttributeValue::Number(49.1)),
                ("LON", AttributeValue::Number(-123.1)),
            ],
            FRASER_BOUNDARY,
        )
        .with_feature(
            [
                ("CODE", AttributeValue::Text("NE02".into())),
                ("LAT", AttributeValue::Empty),
                ("LON", AttributeValue::Empty),
            ],
            FRASER_BOUNDARY,
        );

    let fields = resolve(&mapping, &source);
    let error = ingest_regions(&mut source, &fields, &mut store, watershed_run())
        .expect_err("missing per-feature attribute should abort");

    assert!(matches!(
        error,
        IngestError::AttributeMissing { attribute } if attribute == "NAME"
    ));
    assert_eq!(region_rows(&store), 1);
}
