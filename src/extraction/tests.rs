use super::detectors::FieldDetectors;
use super::lines::segment;
use super::materials::{ConductorMaterial, InsulationMaterial, SheathMaterial};
use super::resolve::{FieldCandidates, resolve};
use super::CableParameterExtractor;

fn extractor() -> CableParameterExtractor {
    CableParameterExtractor::new().expect("detectors compile")
}

fn detectors() -> FieldDetectors {
    FieldDetectors::new().expect("detectors compile")
}

#[test]
fn title_line_yields_voltage_material_and_insulation() {
    let record = extractor().extract("400kV AL 1Cx2500SQmm XLPE INSULATED CABLE\nPage 1 of 3\n");

    assert_eq!(record.conductor_material, Some(ConductorMaterial::Aluminium));
    assert_eq!(record.voltage_kv, Some(400.0));
    assert_eq!(record.insulation_material, Some(InsulationMaterial::Xlpe));
    assert!(record.rated_voltages.is_empty());
    assert_eq!(record.k_value, Some(148.0));
    assert_eq!(record.beta, Some(228.0));
}

#[test]
fn rated_voltage_label_drives_main_voltage() {
    let text = "CABLE DATASHEET\n132kV design\nRATED VOLTAGE : 220/400/420 kV\nEND";
    let record = extractor().extract(text);

    assert_eq!(record.rated_voltages, vec![220.0, 400.0, 420.0]);
    assert_eq!(record.voltage_kv, Some(400.0));
}

#[test]
fn header_voltage_used_when_no_rated_list() {
    let record = extractor().extract("132kV XLPE Cable\nGeneral arrangement");

    assert!(record.rated_voltages.is_empty());
    assert_eq!(record.voltage_kv, Some(132.0));
    assert_eq!(record.insulation_material, Some(InsulationMaterial::Xlpe));
}

#[test]
fn body_conductor_phrase_sets_copper_constants() {
    let text = "CABLE DATASHEET\nDrawing 17\nRevision B\nGeneral\nScope\nNotes\nSummary\nIndex\n\
                The design uses a copper conductor of 630 mm2.";
    let record = extractor().extract(text);

    assert_eq!(record.conductor_material, Some(ConductorMaterial::Copper));
    assert_eq!(record.k_value, Some(226.0));
    assert_eq!(record.beta, Some(234.5));
}

#[test]
fn fault_line_yields_current_and_duration() {
    let text = "CABLE DATASHEET\nFault current Isc = 40 kA for 3 sec\n";
    let record = extractor().extract(text);

    assert_eq!(record.scc_ka, Some(40.0));
    assert_eq!(record.time_sec, Some(3.0));
}

#[test]
fn ambiguous_body_mentions_leave_conductor_unresolved() {
    let text = "CABLE DATASHEET\nDrawing 17\nRevision B\nGeneral\n\
                Screen: copper wires\nArmour: aluminium wires\n";

    assert_eq!(detectors().global_conductor(text), None);
    let record = extractor().extract(text);
    assert_eq!(record.conductor_material, None);
    assert_eq!(record.k_value, None);
    assert_eq!(record.beta, None);
}

#[test]
fn ambiguous_body_mentions_defer_to_header_conductor() {
    let text = "CABLE DATASHEET\nDrawing 17\nAluminium conductor design\nGeneral\n\
                Screen: copper wires\nArmour: aluminium wires\n";
    let record = extractor().extract(text);

    assert_eq!(record.conductor_material, Some(ConductorMaterial::Aluminium));
}

#[test]
fn header_conductor_outranks_body_phrase() {
    let text = "400kV XLPE CABLE\nAluminium conductor, lead sheath\nDrawing 17\nRevision B\n\
                Reference: copper conductor variant";
    let record = extractor().extract(text);

    assert_eq!(record.conductor_material, Some(ConductorMaterial::Aluminium));
    assert_eq!(record.sheath_material, Some(SheathMaterial::Lead));
}

#[test]
fn extraction_is_repeatable() {
    let text = "220kV CU XLPE CABLE\nPVC outer sheath\nRATED VOLTAGE : 127/220/245 kV\n\
                Short circuit 63 kA 1 s";
    let extractor = extractor();

    assert_eq!(extractor.extract(text), extractor.extract(text));
}

#[test]
fn empty_text_returns_fully_unresolved_record() {
    let record = extractor().extract("");

    assert_eq!(record, resolve(FieldCandidates::default()));
    assert_eq!(record.voltage_kv, None);
    assert_eq!(record.scc_ka, None);
    assert_eq!(record.time_sec, None);
    assert_eq!(record.sheath_material, None);
    assert_eq!(record.insulation_material, None);
    assert_eq!(record.outer_sheath_material, None);
}

#[test]
fn noisy_text_never_panics() {
    let extractor = extractor();
    for text in [
        "kV kA s sec",
        "RATED VOLTAGE : / / kV",
        "....,,,, 1e999 kA short",
        "\u{0}\u{c}\n\n\r\n",
        "999999999999999999999999999999 kA fault 1,2,3 secs",
    ] {
        let record = extractor.extract(text);
        assert!(record.scc_ka.is_none_or(|value| value > 0.0 && value < 1000.0));
    }
}

#[test]
fn header_material_hint_checks_copper_first() {
    let window = segment("66kV copper and aluminium variants\n", 8);
    let (voltage, material) = detectors().header_voltage_and_material(&window);

    assert_eq!(voltage, Some(66.0));
    assert_eq!(material, Some(ConductorMaterial::Copper));
}

#[test]
fn header_voltage_reads_only_two_lines() {
    let window = segment("CABLE DATASHEET\nType A\n33 kV variant", 8);
    let (voltage, _) = detectors().header_voltage_and_material(&window);

    assert_eq!(voltage, None);
}

#[test]
fn insulation_follows_keyword_priority() {
    let detectors = detectors();
    let cases = [
        ("220kV XLPE CABLE WITH PVC JACKET", Some(InsulationMaterial::Xlpe)),
        ("33kV EPR / PVC CABLE", Some(InsulationMaterial::Epr)),
        ("11kV PE insulated cable", Some(InsulationMaterial::Pe)),
        ("1kV cable\nPE insulation", Some(InsulationMaterial::Pe)),
        ("132kV oil-filled cable", Some(InsulationMaterial::Oil)),
        ("132kV cable with oil", None),
    ];

    for (text, expected) in cases {
        let (insulation, _) = detectors.insulation_and_outer_sheath(&segment(text, 8));
        assert_eq!(insulation, expected, "{text}");
    }
}

#[test]
fn outer_sheath_accepts_only_known_compounds() {
    let detectors = detectors();

    let (_, outer) =
        detectors.insulation_and_outer_sheath(&segment("400kV XLPE cable\nHDPE-free PE outer sheath", 8));
    assert_eq!(outer, Some(InsulationMaterial::Pe));

    let (_, outer) =
        detectors.insulation_and_outer_sheath(&segment("400kV XLPE cable\nblack outer sheath", 8));
    assert_eq!(outer, None);

    let (_, outer) = detectors
        .insulation_and_outer_sheath(&segment("Line one\nLine two\nLine three\nPVC outer sheath", 8));
    assert_eq!(outer, None);
}

#[test]
fn header_conductor_and_sheath_use_four_lines() {
    let detectors = detectors();
    let text = "400kV CABLE\nType 1\nType 2\nCu stranded conductor with corrugated aluminium sheath";
    let (conductor, sheath) = detectors.header_conductor_and_sheath(&segment(text, 8));

    assert_eq!(conductor, Some(ConductorMaterial::Copper));
    assert_eq!(sheath, Some(SheathMaterial::Aluminium));

    let deeper = "a\nb\nc\nd\nCopper conductor, bronze sheath";
    assert_eq!(
        detectors.header_conductor_and_sheath(&segment(deeper, 8)),
        (None, None)
    );
}

#[test]
fn conductor_phrase_does_not_cross_commas() {
    let (conductor, sheath) = detectors()
        .header_conductor_and_sheath(&segment("Copper wire screen, XLPE, steel tape sheath", 8));

    assert_eq!(conductor, None);
    assert_eq!(sheath, Some(SheathMaterial::Steel));
}

#[test]
fn global_conductor_strong_phrases() {
    let detectors = detectors();

    assert_eq!(
        detectors.global_conductor("... CU CONDUCTOR ... aluminium foil"),
        Some(ConductorMaterial::Copper)
    );
    assert_eq!(
        detectors.global_conductor("aluminum conductor, copper screen"),
        Some(ConductorMaterial::Aluminium)
    );
    assert_eq!(
        detectors.global_conductor("Screen: copper wires\nMetallic electrical conductor screen"),
        Some(ConductorMaterial::Aluminium)
    );
}

#[test]
fn global_conductor_weak_fallback_needs_single_material() {
    let detectors = detectors();

    assert_eq!(
        detectors.global_conductor("copper tape screen"),
        Some(ConductorMaterial::Copper)
    );
    assert_eq!(
        detectors.global_conductor("wires of al alloy"),
        Some(ConductorMaterial::Aluminium)
    );
    assert_eq!(detectors.global_conductor("no material named"), None);
}

#[test]
fn rated_voltages_keep_label_order() {
    let detectors = detectors();

    assert_eq!(
        detectors.rated_voltages("Rated Voltage: 0.6/1.0 kV\n"),
        vec![0.6, 1.0]
    );
    assert_eq!(
        detectors.rated_voltages("RATED  VOLTAGE :76/132/145kV"),
        vec![76.0, 132.0, 145.0]
    );
    assert!(detectors.rated_voltages("RATED CURRENT : 1200 A").is_empty());
}

#[test]
fn short_circuit_current_prefers_keyword_lines() {
    let text = "Weight 95 kg/km\nShort circuit rating 2500 kA / 50 kA\n";

    assert_eq!(detectors().short_circuit_current(text), Some(50.0));
}

#[test]
fn short_circuit_current_falls_back_to_ka_lines() {
    let detectors = detectors();

    assert_eq!(
        detectors.short_circuit_current("Withstand: 31,5 kA\nLength 800 m"),
        Some(31.5)
    );
    assert_eq!(detectors.short_circuit_current("Length 800 m"), None);
}

#[test]
fn short_circuit_duration_prefers_keyword_lines() {
    let detectors = detectors();
    let text = "Test time 10 s\nShort circuit 1 sec\n";

    assert_eq!(detectors.short_circuit_duration(text), Some(1.0));
    assert_eq!(
        detectors.short_circuit_duration("Duration 0,5 s at rated load"),
        Some(0.5)
    );
    assert_eq!(detectors.short_circuit_duration("Conductor 95 sqmm"), Some(95.0));
    assert_eq!(
        detectors.short_circuit_duration("400kV AL 1Cx2500SQmm\nFault duration 1 s"),
        Some(1.0)
    );
}

#[test]
fn short_circuit_current_bounds_are_exclusive() {
    let detectors = detectors();

    assert_eq!(detectors.short_circuit_current("Short circuit 0 kA"), None);
    assert_eq!(detectors.short_circuit_current("Short circuit 1000 kA"), None);
    assert_eq!(
        detectors.short_circuit_current("Short circuit 999.9 kA"),
        Some(999.9)
    );
    assert_eq!(
        detectors.short_circuit_current("Short circuit 0 kA / 1000 kA / 999,9 kA"),
        Some(999.9)
    );
}

#[test]
fn extractor_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CableParameterExtractor>();

    let owned = extractor();
    let extractor = &owned;
    let texts = [
        "400kV AL 1Cx2500SQmm XLPE INSULATED CABLE\nShort circuit 63 kA 1 s",
        "CABLE DATASHEET\nRATED VOLTAGE : 220/400/420 kV\ncopper conductor",
        "",
    ];
    let expected = texts.map(|text| extractor.extract(text));

    let concurrent = std::thread::scope(|scope| {
        let handles = texts.map(|text| scope.spawn(move || extractor.extract(text)));
        handles.map(|handle| handle.join().expect("extraction thread"))
    });

    assert_eq!(concurrent, expected);
}
