//! End-to-end controller flows over an on-disk data directory.

use std::fs;
use std::path::Path;

use cnp_precios::catalog::{CatalogState, GridView, LOAD_ERROR_MESSAGE, LoadStatus, load_catalog, render_grid};
use cnp_precios::data::{DataLocation, LocalSource};
use cnp_precios::detail::{ChartState, DetailOutcome, DetailPhase, DetailState, load_detail};
use cnp_precios::domain::{SortKey, Trend};
use cnp_precios::error::ErrorKind;
use cnp_precios::nav::Route;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Run both detail steps the way the TUI does, one after the other.
fn open_detail(state: &mut DetailState, source: &LocalSource) {
    state.resolve(source);
    state.load_chart(source);
}

fn data_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        "resumen.json",
        r#"{"total_productos": 3, "ultima_actualizacion": "2025-03-14T08:00:00"}"#,
    );
    write(
        root,
        "productos.json",
        r#"[
            {"nombre": "Leche 1L", "precio_actual": 900, "precio_minimo": 850, "precio_maximo": 950,
             "precio_promedio": 905.5, "total_registros": 12, "ultima_fecha": "2025-03-10",
             "tendencia_tipo": "subida", "tendencia_porcentaje": 1.8},
            {"nombre": "Arroz 1kg", "precio_actual": 1250, "tendencia_tipo": "bajada", "tendencia_porcentaje": -2.0},
            {"nombre": "Café molido", "precio_actual": 3100, "tendencia_tipo": "estable", "tendencia_porcentaje": 0.0}
        ]"#,
    );
    write(
        root,
        "historicos_index.json",
        r#"[
            {"producto": "Leche 1L", "archivo": "leche_1l.json"},
            {"producto": "Café molido", "archivo": "cafe_molido.json"}
        ]"#,
    );
    write(
        root,
        "historicos/leche_1l.json",
        r#"[
            {"fecha": "2025-01-05", "precio": 850},
            {"fecha": "2025-02-05", "precio": 880},
            {"fecha": "2025-03-10", "precio": 900}
        ]"#,
    );
    write(
        root,
        "historicos/cafe_molido.json",
        r#"[{"fecha": "2025-03-01", "precio": 3100}]"#,
    );
    tmp
}

#[test]
fn catalog_loads_filters_and_sorts() {
    let tmp = data_dir();
    let source = LocalSource::new(tmp.path());

    let data = load_catalog(&source).unwrap();
    assert_eq!(data.summary.total_products, 3);
    assert_eq!(data.products.len(), 3);

    let mut state = CatalogState::new(data);
    assert_eq!(state.results_line(), "Showing 3 of 3 products");
    let names: Vec<&str> = state.filtered().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Arroz 1kg", "Café molido", "Leche 1L"]);

    state.set_sort(SortKey::Price);
    assert_eq!(state.filtered()[0].name, "Leche 1L");

    // Search folds case but not accents.
    state.apply_filters(Some("CAFE"));
    assert!(state.filtered().is_empty());
    assert_eq!(render_grid(&state), GridView::Empty);

    state.apply_filters(Some("  CAFÉ "));
    assert_eq!(state.filtered().len(), 1);

    state.clear_search();
    state.set_trend(Some(Trend::Falling));
    assert_eq!(state.filtered().len(), 1);
    assert_eq!(state.filtered()[0].name, "Arroz 1kg");

    let stats = state.quick_stats();
    assert_eq!((stats.rising, stats.falling, stats.stable), (1, 1, 1));
}

#[test]
fn missing_products_file_leaves_empty_catalog() {
    let tmp = data_dir();
    fs::remove_file(tmp.path().join("productos.json")).unwrap();
    let source = LocalSource::new(tmp.path());

    let err = load_catalog(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataLoad);

    let state = CatalogState::load(&source);
    assert_eq!(state.status(), &LoadStatus::Failed(LOAD_ERROR_MESSAGE.to_string()));
    assert!(state.products().is_empty());
    assert_eq!(render_grid(&state), GridView::Empty);
}

#[test]
fn detail_resolves_product_with_chart() {
    let tmp = data_dir();
    let source = LocalSource::new(tmp.path());

    let outcome = load_detail(&source, "Leche 1L").unwrap();
    assert_eq!(outcome.phase(), DetailPhase::ChartReady);
    let DetailOutcome::Resolved { product, chart } = outcome else {
        panic!("expected a resolved product");
    };
    assert_eq!(product.record_count, 12);
    let ChartState::Ready(series) = chart else {
        panic!("expected a chart");
    };
    assert_eq!(series.labels, ["5 ene", "5 feb", "10 mar"]);
    assert_eq!(series.values, [850.0, 880.0, 900.0]);
}

#[test]
fn unknown_product_redirects() {
    let tmp = data_dir();
    let source = LocalSource::new(tmp.path());

    let outcome = load_detail(&source, "leche 1l").unwrap();
    assert_eq!(outcome, DetailOutcome::Redirect(Route::Catalog));

    let mut state = DetailState::loading("Pan");
    open_detail(&mut state, &source);
    assert!(state.is_redirect());
    assert!(state.view.is_none());
}

#[test]
fn missing_or_short_history_is_a_chart_error() {
    let tmp = data_dir();
    let source = LocalSource::new(tmp.path());

    // Not in the index.
    let mut state = DetailState::loading("Arroz 1kg");
    open_detail(&mut state, &source);
    assert_eq!(state.phase, DetailPhase::ChartError);
    assert_eq!(state.view.as_ref().unwrap().current_price, "₡ 1 250");

    // Single observation.
    let outcome = load_detail(&source, "Café molido").unwrap();
    assert_eq!(outcome.phase(), DetailPhase::ChartError);
}

#[test]
fn product_list_failure_is_a_load_error() {
    let tmp = tempfile::tempdir().unwrap();
    let source = LocalSource::new(tmp.path());

    let err = load_detail(&source, "Leche 1L").unwrap_err();
    assert_eq!(err.exit_code(), 4);

    let mut state = DetailState::loading("Leche 1L");
    open_detail(&mut state, &source);
    assert_eq!(state.phase, DetailPhase::LoadFailed);
    assert_eq!(state.error.as_deref(), Some("Error loading product"));
}

#[test]
fn data_location_opens_local_dirs() {
    let tmp = data_dir();
    let location = DataLocation::parse(tmp.path().to_str().unwrap());
    let source = location.open().unwrap();
    assert_eq!(load_catalog(source.as_ref()).unwrap().products.len(), 3);

    let missing = DataLocation::parse("/definitely/not/here");
    assert_eq!(missing.open().err().unwrap().kind(), ErrorKind::Usage);
}

#[test]
fn card_links_round_trip_to_routes() {
    let tmp = data_dir();
    let source = LocalSource::new(tmp.path());
    let state = CatalogState::load(&source);

    let GridView::Cards(cards) = render_grid(&state) else {
        panic!("expected cards");
    };
    for card in cards {
        assert_eq!(Route::parse(&card.href), Route::Product(card.name.clone()));
    }
}

#[test]
fn rows_with_null_or_missing_fields_still_load() {
    let tmp = data_dir();
    write(
        tmp.path(),
        "productos.json",
        r#"[
            {"nombre": "Leche 1L", "precio_actual": 900, "tendencia_tipo": "subida", "tendencia_porcentaje": 1.8},
            {"nombre": "Sal", "precio_actual": null, "tendencia_tipo": "bajada", "tendencia_porcentaje": null},
            {"nombre": "Pan", "precio_actual": 800}
        ]"#,
    );
    write(tmp.path(), "resumen.json", r#"{"total_productos": null}"#);
    let source = LocalSource::new(tmp.path());

    let mut state = CatalogState::load(&source);
    assert_eq!(state.status(), &LoadStatus::Ready);
    assert_eq!(state.products().len(), 3);
    assert_eq!(state.summary().total_products, 0);

    let stats = state.quick_stats();
    assert_eq!((stats.rising, stats.falling, stats.stable), (1, 1, 1));
    assert_eq!(stats.mean_price, 850.0);

    let GridView::Cards(cards) = render_grid(&state) else {
        panic!("expected cards");
    };
    let sal = cards.iter().find(|c| c.name == "Sal").unwrap();
    assert_eq!(sal.price, "₡ -");
    assert_eq!(sal.trend, "");

    state.set_sort(SortKey::Price);
    assert_eq!(state.filtered().last().unwrap().name, "Sal");

    let mut detail = DetailState::loading("Sal");
    open_detail(&mut detail, &source);
    let view = detail.view.as_ref().unwrap();
    assert_eq!(view.current_price, "₡ -");
    assert_eq!(view.trend_value, "");
}
