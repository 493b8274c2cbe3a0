use ideograph::identity::{load_entities, IdValue, Namespace};
use ideograph::matrix::{EdgeList, FeatureMatrix, IndexMapping};
use ideograph::{DonationTable, NativeId, Pipeline, PipelineConfig, PipelineError, ResolveError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Two members, one linked to LittleSis through the registry, one donation edge
fn two_member_fixture(dir: &Path) {
    write(
        dir,
        "voteview-HS117_members.csv",
        "congress,chamber,icpsr,bioguide_id,bioname\n\
         117,House,1,A1,\"DOE, Jane\"\n\
         117,House,2,A2,\"ROE, Rick\"\n",
    );
    write(
        dir,
        "legislators-historical.json",
        r#"[{"id": {"icpsr": 1, "govtrack": 100, "bioguide": "A1"}, "name": {"first": "Jane"}}]"#,
    );
    write(
        dir,
        "littlesis-entities.json",
        r#"[{"id": 9001, "attributes": {"name": "Jane Doe",
             "extensions": {"ElectedRepresentative": {"govtrack_id": "100", "bioguide_id": null}}}}]"#,
    );
    write(
        dir,
        "littlesis-graph.json",
        r#"{"nodes": [{"key": 9001, "attributes": {"id": 9001}},
                      {"key": 42, "attributes": {"id": 42}}],
            "edges": [{"source": 42, "target": 9001, "attributes": {"amount": 99.0}}]}"#,
    );
}

fn config_for(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_end_to_end_two_members() {
    let dir = TempDir::new().unwrap();
    two_member_fixture(dir.path());
    let pipeline = Pipeline::new(config_for(dir.path())).unwrap();

    let summary = pipeline.run().unwrap();
    assert!(summary.projected.is_none());

    // Entity list on disk
    let entities = load_entities(&pipeline.paths().politicians).unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].id(Namespace::Littlesis), Some(&IdValue::Integer(9001)));
    assert!(!entities[1].has_id(Namespace::Littlesis));

    // Donation mapping is {9001: {42: 99.0}}
    let donations = DonationTable::load(&pipeline.paths().donations).unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations.amount(&NativeId::from(9001), &NativeId::from(42)), Some(99.0));

    // Dense artifacts agree with each other
    let mapping = IndexMapping::load(&pipeline.paths().native_to_dense, &pipeline.paths().dense_to_native).unwrap();
    assert_eq!(mapping.dense_of(&NativeId::from(9001)), Some(1));
    assert_eq!(mapping.dense_of(&NativeId::from(42)), Some(2));

    let edges = fs::read_to_string(&pipeline.paths().edge_list).unwrap();
    assert_eq!(edges, "2,1\n");
    assert_eq!(EdgeList::read(&pipeline.paths().edge_list).unwrap().pairs(), &[(2, 1)]);

    let features = FeatureMatrix::read_csv(&pipeline.paths().feature_matrix).unwrap();
    assert_eq!(features.politicians(), &[NativeId::from(9001)]);
    assert_eq!(features.get(1, &NativeId::from(9001)), Some(0.0));
    assert!((features.get(2, &NativeId::from(9001)).unwrap() - 100f64.ln()).abs() < 1e-12);
}

#[test]
fn test_coverage_report_is_written() {
    let dir = TempDir::new().unwrap();
    two_member_fixture(dir.path());
    let pipeline = Pipeline::new(config_for(dir.path())).unwrap();
    pipeline.map_ids().unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&pipeline.paths().coverage).unwrap()).unwrap();
    assert_eq!(report["before_mapping"], serde_json::json!({}));
    assert_eq!(report["after_icpsr"]["icpsr"], 2);
    assert_eq!(report["after_all"]["littlesis"], 1);
}

#[test]
fn test_duplicate_registry_govtrack_aborts_without_output() {
    let dir = TempDir::new().unwrap();
    two_member_fixture(dir.path());
    write(
        dir.path(),
        "legislators-historical.json",
        r#"[{"id": {"icpsr": 1, "govtrack": 100}}, {"id": {"icpsr": 2, "govtrack": 100}}]"#,
    );
    let pipeline = Pipeline::new(config_for(dir.path())).unwrap();

    let err = pipeline.map_ids().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Resolve(ResolveError::DuplicateIdentifier { namespace: Namespace::Govtrack, .. })
    ));
    assert!(!pipeline.paths().politicians.exists());
}

#[test]
fn test_stale_mapping_detected_after_graph_change() {
    let dir = TempDir::new().unwrap();
    two_member_fixture(dir.path());
    let pipeline = Pipeline::new(config_for(dir.path())).unwrap();
    pipeline.run().unwrap();

    write(
        dir.path(),
        "littlesis-graph.json",
        r#"{"nodes": [{"key": 42}, {"key": 9001, "attributes": {"id": 9001}}], "edges": []}"#,
    );
    let graph = ideograph::RelationshipGraph::load(&pipeline.paths().graph).unwrap();
    let mapping = IndexMapping::load(&pipeline.paths().native_to_dense, &pipeline.paths().dense_to_native).unwrap();
    assert!(mapping.ensure_generation(&graph).is_err());
}

/// Four members linked by bioguide, each with a donor, plus NVD output on a line
fn four_member_fixture(dir: &Path) {
    let mut members = String::from("icpsr,bioguide_id\n");
    let mut littlesis = Vec::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for i in 1..=4 {
        members.push_str(&format!("{},B{}\n", i, i));
        littlesis.push(format!(
            r#"{{"id": {}, "attributes": {{"extensions": {{"ElectedRepresentative": {{"bioguide_id": "B{}"}}}}}}}}"#,
            9000 + i,
            i
        ));
        nodes.push(format!(r#"{{"key": {0}, "attributes": {{"id": {0}}}}}"#, 9000 + i));
        edges.push(format!(
            r#"{{"source": 42, "target": {}, "attributes": {{"amount": {}}}}}"#,
            9000 + i,
            i * 10
        ));
    }
    nodes.push(r#"{"key": 42}"#.to_string());

    write(dir, "voteview-HS117_members.csv", &members);
    write(dir, "legislators-historical.json", "[]");
    write(dir, "littlesis-entities.json", &format!("[{}]", littlesis.join(",")));
    write(
        dir,
        "littlesis-graph.json",
        &format!(r#"{{"nodes": [{}], "edges": [{}]}}"#, nodes.join(","), edges.join(",")),
    );

    let nvd = dir.join("nvd");
    fs::create_dir_all(&nvd).unwrap();
    for i in 1..=4 {
        let mut rows = String::from("src,dst,distance\n");
        for j in (i + 1)..=4 {
            rows.push_str(&format!("{},{},{}\n", 9000 + i, 9000 + j, (j - i) as f64));
        }
        write(&nvd, &format!("{}.csv", 9000 + i), &rows);
    }
}

#[test]
fn test_full_run_with_projection() {
    let dir = TempDir::new().unwrap();
    four_member_fixture(dir.path());
    let config = PipelineConfig {
        projections: vec!["MDS-1".parse().unwrap(), "PCA-2".parse().unwrap(), "Isomap-1".parse().unwrap()],
        isomap_neighbors: 2,
        ..config_for(dir.path())
    };
    let pipeline = Pipeline::new(config).unwrap();

    let summary = pipeline.run().unwrap();
    let projected = summary.projected.unwrap();
    assert_eq!(projected.len(), 4);

    let entities = load_entities(&pipeline.paths().politicians).unwrap();
    assert_eq!(entities.len(), projected.len());
    for entity in &entities {
        assert_eq!(entity.embeddings["MDS-1"].len(), 1);
        assert_eq!(entity.embeddings["PCA-2"].len(), 2);
        assert_eq!(entity.embeddings["Isomap-1"].len(), 1);
    }

    // Points on a line keep their order along the first MDS axis
    let mds: Vec<f64> = entities.iter().map(|e| e.embeddings["MDS-1"][0]).collect();
    let ascending = mds.windows(2).all(|w| w[0] < w[1]);
    let descending = mds.windows(2).all(|w| w[0] > w[1]);
    assert!(ascending || descending, "{:?}", mds);
    assert!(mds.iter().any(|&c| c == 1.0) && mds.iter().any(|&c| c == -1.0));
}

#[test]
fn test_projection_requires_every_politician_to_resolve() {
    let dir = TempDir::new().unwrap();
    four_member_fixture(dir.path());
    let pipeline = Pipeline::new(config_for(dir.path())).unwrap();
    pipeline.map_ids().unwrap();
    pipeline.donations().unwrap();
    pipeline.build_matrix().unwrap();
    pipeline.distances().unwrap();

    // Drop one member so politician 9004 no longer has an entity
    let entities = load_entities(&pipeline.paths().politicians).unwrap();
    ideograph::identity::save_entities(&pipeline.paths().politicians, &entities[..3]).unwrap();

    assert!(matches!(
        pipeline.project(),
        Err(PipelineError::Projection(ideograph::ProjectionError::UnresolvedPolitician { matches: 0, .. }))
    ));
}
