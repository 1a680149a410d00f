//! End-to-end coupling scenario: decode, register, close, exchange.
//!
//! Drives a realistic surface-coupling setup through its full life cycle:
//! 1. Decode the coupler's fixed-width slot metadata for both directions
//! 2. Register every slot (sentinels interleaved, shuffled order)
//! 3. First export pass skips model-computed quantities
//! 4. Import pass writes model fields, flipping flux sign conventions
//! 5. Second export publishes everything, applying constant multiples
//! 6. Values untouched by either pass survive both

use surface_coupling::{
    ColumnGrid, CouplingConfig, Field, FieldCatalog, FieldIntent, FieldLayout, NAME_RECORD_LEN,
    SlotTable, SurfaceExporter, SurfaceImporter, Unit,
};

const N_COLS: usize = 4;
const N_LEVS: usize = 6;
const PACK: usize = 4;

/// Pack slot names into the coupler's fixed-width NUL-padded record buffer.
fn pack_names(names: &[&str]) -> Vec<u8> {
    let mut buf = vec![0_u8; names.len() * NAME_RECORD_LEN];
    for (i, name) in names.iter().enumerate() {
        let start = i * NAME_RECORD_LEN;
        buf[start..start + name.len()].copy_from_slice(name.as_bytes());
    }
    buf
}

fn surface_scalar(name: &str, intent: FieldIntent, unit: Unit) -> Field {
    let mut f = Field::new(
        name,
        FieldLayout::surface_scalar("physics", N_COLS, unit),
        intent,
        1,
    );
    f.allocate();
    f
}

/// The model-side field set: imported surface quantities, exported state,
/// and one computed-only export.
fn build_catalog() -> FieldCatalog {
    let mut catalog = FieldCatalog::new();

    for (name, unit) in [
        ("sfc_alb_dir_vis", Unit::NONDIM),
        ("T_2m", Unit::KELVIN),
        ("qv_2m", Unit::NONDIM),
        ("wind_speed_10m", Unit::M_PER_S),
        ("surf_sens_flux", Unit::W_PER_M2),
        ("surf_lw_flux_up", Unit::W_PER_M2),
    ] {
        catalog
            .insert(surface_scalar(name, FieldIntent::Required, unit))
            .unwrap();
    }
    let mut mom_flux = Field::new(
        "surf_mom_flux",
        FieldLayout::surface_vector("physics", N_COLS, 2, Unit::PASCAL),
        FieldIntent::Required,
        1,
    );
    mom_flux.allocate();
    catalog.insert(mom_flux).unwrap();

    // Exported state carried across steps (valid from initialization on).
    let mut t_mid = Field::new(
        "T_mid",
        FieldLayout::midpoint_scalar("physics", N_COLS, N_LEVS, Unit::KELVIN),
        FieldIntent::Updated,
        PACK,
    );
    t_mid.allocate();
    let stride = t_mid.column_stride();
    {
        let data = t_mid.data_mut().unwrap();
        for c in 0..N_COLS {
            for l in 0..N_LEVS {
                data[c * stride + l] = 250.0 + l as f64;
            }
        }
    }
    catalog.insert(t_mid).unwrap();

    let mut winds = Field::new(
        "horiz_winds",
        FieldLayout::midpoint_vector("physics", N_COLS, 2, N_LEVS, Unit::M_PER_S),
        FieldIntent::Updated,
        PACK,
    );
    winds.allocate();
    {
        // Per-component padded run is 8; bottom-level values live at the
        // start of each run in this scenario.
        let data = winds.data_mut().unwrap();
        for c in 0..N_COLS {
            data[c * 16] = 5.0 + c as f64;
            data[c * 16 + 8] = -2.0 - c as f64;
        }
    }
    catalog.insert(winds).unwrap();

    // Produced by the first step's microphysics; sentinel-filled until then.
    catalog
        .insert(surface_scalar(
            "precip_liq_surf",
            FieldIntent::Computed,
            Unit::M_PER_S,
        ))
        .unwrap();

    catalog
}

/// Import slots in coupler order: a sentinel interleaved among real names,
/// flux fields among them.
fn import_table() -> SlotTable {
    let names = pack_names(&[
        "T_2m",
        "surf_mom_flux",
        "unused",
        "surf_mom_flux",
        "surf_sens_flux",
        "qv_2m",
    ]);
    let comps = [-1, 0, -1, 1, -1, -1];
    let mults = [1.0; 6];
    SlotTable::decode(&names, &comps, &mults).unwrap()
}

/// Export slots: mixed eligibility, one sentinel, one constant multiple.
fn export_table() -> SlotTable {
    let names = pack_names(&[
        "T_mid",
        "precip_liq_surf",
        "set_zero",
        "horiz_winds",
        "horiz_winds",
    ]);
    let comps = [-1, -1, -1, 0, 1];
    // Precipitation leaves in mm/s rather than m/s.
    let mults = [1.0, 1000.0, 1.0, 1.0, 1.0];
    SlotTable::decode(&names, &comps, &mults).unwrap()
}

#[test]
fn test_registration_counts_and_descriptors() {
    let catalog = build_catalog();
    let grid = ColumnGrid::new("physics", N_COLS, N_LEVS);

    let mut importer = SurfaceImporter::new(grid.clone(), CouplingConfig::default());
    let table = import_table();
    importer.open(N_COLS, table.len()).unwrap();
    importer.register_all(&catalog, &table).unwrap();
    importer.close().unwrap();

    // Six slots, one sentinel -> five descriptors.
    assert_eq!(importer.registered_count(), 5);

    // The sentinel slot left no descriptor, so the momentum-flux components
    // sit adjacent in the table; they share a stride but not an offset.
    let d0 = &importer.descriptors()[1];
    let d1 = &importer.descriptors()[2];
    assert_eq!(d0.field_name(), "surf_mom_flux");
    assert_eq!(d0.span().stride(), 2);
    assert_eq!(d0.span().offset(), 0);
    assert_eq!(d1.span().offset(), 1);
    assert_eq!(d0.scale(), -1.0);
    assert_eq!(d1.scale(), -1.0);

    let mut exporter = SurfaceExporter::new(grid, CouplingConfig::default());
    let table = export_table();
    exporter.open(N_COLS, table.len()).unwrap();
    exporter.register_all(&catalog, &table).unwrap();
    exporter.close().unwrap();
    assert_eq!(exporter.registered_count(), 4);
}

#[test]
fn test_full_exchange_cycle() {
    let mut catalog = build_catalog();
    let grid = ColumnGrid::new("physics", N_COLS, N_LEVS);
    let config = CouplingConfig::default().with_pack_width(PACK);

    let import_slots = import_table();
    let mut importer = SurfaceImporter::new(grid.clone(), config);
    importer.open(N_COLS, import_slots.len()).unwrap();
    importer.register_all(&catalog, &import_slots).unwrap();
    importer.close().unwrap();

    let export_slots = export_table();
    let mut exporter = SurfaceExporter::new(grid, config);
    exporter.open(N_COLS, export_slots.len()).unwrap();
    exporter.register_all(&catalog, &export_slots).unwrap();
    exporter.close().unwrap();

    // --- Initialization: export before any physics has run. ---
    let mut export_buf = vec![-99.0; N_COLS * export_slots.len()];
    exporter.run(&catalog, &mut export_buf).unwrap();

    for c in 0..N_COLS {
        let row = &export_buf[c * 5..(c + 1) * 5];
        // T_mid exports its top-of-column scalar (offset 0).
        assert_eq!(row[0], 250.0);
        // precip_liq_surf is computed-only: untouched on the init pass.
        assert_eq!(row[1], -99.0);
        // Sentinel slot untouched by the engine.
        assert_eq!(row[2], -99.0);
        assert_eq!(row[3], 5.0 + c as f64);
        assert_eq!(row[4], -2.0 - c as f64);
    }

    // --- Step 1: import surface data from the coupler. ---
    let mut import_buf = vec![0.0; N_COLS * import_slots.len()];
    for c in 0..N_COLS {
        let row = &mut import_buf[c * 6..(c + 1) * 6];
        row.copy_from_slice(&[
            280.0 + c as f64, // T_2m
            0.08,             // surf_mom_flux zonal
            123.0,            // unused slot, must be ignored
            -0.02,            // surf_mom_flux meridional
            15.0,             // surf_sens_flux
            0.012,            // qv_2m
        ]);
    }
    importer.run(&mut catalog, &import_buf).unwrap();

    let t_2m = catalog.get("T_2m").unwrap().data().unwrap();
    for c in 0..N_COLS {
        assert_eq!(t_2m[c], 280.0 + c as f64);
    }
    // Sign convention flips on import for flux quantities.
    let mom = catalog.get("surf_mom_flux").unwrap().data().unwrap();
    for c in 0..N_COLS {
        assert_eq!(mom[c * 2], -0.08);
        assert_eq!(mom[c * 2 + 1], 0.02);
    }
    let sens = catalog.get("surf_sens_flux").unwrap().data().unwrap();
    assert!(sens.iter().all(|&v| v == -15.0));
    // Fields behind no import slot stay exactly as allocated.
    assert!(
        catalog
            .get("sfc_alb_dir_vis")
            .unwrap()
            .data()
            .unwrap()
            .iter()
            .all(|v| v.is_nan())
    );

    // --- Step 1 physics produces the computed export. ---
    catalog
        .get_mut("precip_liq_surf")
        .unwrap()
        .fill(2.0e-4)
        .unwrap();

    // --- Step 1 export: everything publishes now. ---
    exporter.run(&catalog, &mut export_buf).unwrap();
    for c in 0..N_COLS {
        let row = &export_buf[c * 5..(c + 1) * 5];
        assert_eq!(row[0], 250.0);
        // Constant multiple applied exactly: m/s -> mm/s.
        assert_eq!(row[1], 0.2);
        assert_eq!(row[2], -99.0);
        assert_eq!(row[3], 5.0 + c as f64);
    }

    // Round-trip: the imported values survived an unrelated export.
    let t_2m = catalog.get("T_2m").unwrap().data().unwrap();
    for c in 0..N_COLS {
        assert_eq!(t_2m[c], 280.0 + c as f64);
    }
}

#[test]
fn test_reimport_is_idempotent_for_unscaled_slots() {
    let mut catalog = build_catalog();
    let grid = ColumnGrid::new("physics", N_COLS, N_LEVS);

    let table = import_table();
    let mut importer = SurfaceImporter::new(grid, CouplingConfig::default());
    importer.open(N_COLS, table.len()).unwrap();
    importer.register_all(&catalog, &table).unwrap();
    importer.close().unwrap();

    let buf: Vec<f64> = (0..N_COLS * table.len()).map(|i| i as f64 * 0.5).collect();
    importer.run(&mut catalog, &buf).unwrap();
    let first: Vec<f64> = catalog.get("T_2m").unwrap().data().unwrap().to_vec();
    importer.run(&mut catalog, &buf).unwrap();
    assert_eq!(catalog.get("T_2m").unwrap().data().unwrap(), &first[..]);
}
