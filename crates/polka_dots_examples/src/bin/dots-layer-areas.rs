use polka_dots::prelude::*;
use polka_dots_examples::{init_tracing, render_store_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Survey layer: an L-shaped field, a circular pond and a marker pin.
    let field = vec![
        GeoPoint::new(52.500, 13.400),
        GeoPoint::new(52.512, 13.400),
        GeoPoint::new(52.512, 13.408),
        GeoPoint::new(52.506, 13.408),
        GeoPoint::new(52.506, 13.420),
        GeoPoint::new(52.500, 13.420),
    ];
    let mut store = MemoryStore::new();
    store.add_layer("survey", "Survey");
    store.insert(
        Entity::new("field", Location::Area(AreaLocation::polygon(field.clone())))
            .with_name("F")
            .with_container("survey"),
    );
    store.insert(
        Entity::new(
            "pond",
            Location::Area(AreaLocation::circle(GeoPoint::new(52.509, 13.416), 250.0)),
        )
        .with_name("P")
        .with_container("survey"),
    );
    store.insert(
        Entity::new("pin", Location::Point(GeoPoint::new(52.503, 13.404)))
            .with_container("survey"),
    );

    let config = DotsConfig::new(100.0)
        .with_prefix(PrefixSource::FromEntity)
        .with_color(ColorSource::Fixed(Color::from_argb(255, 20, 140, 60)));

    let mut events = FnSink::new(|event: DotsEvent| {
        if let DotsEvent::Committed { entity_id, report } = event {
            tracing::info!("{entity_id}: {} dots", report.created.len());
        }
    });
    let mut rng = StdRng::seed_from_u64(42);
    let mut runner = DotsRunner::try_new(config, &mut store)?;
    let Some(layer) = runner.host.layer("survey") else {
        anyhow::bail!("survey layer missing");
    };
    let report = runner.run_layer_with_events(&layer, &mut rng, &mut events)?;
    tracing::info!(
        "survey: {} of {} members produced {} dots",
        report.materialized(),
        report.outcomes.len(),
        report.dots_created()
    );

    let Some(bounds) = GeoBox::from_points(&field) else {
        anyhow::bail!("field has no points");
    };
    let rc = RenderConfig::new((1000, 1000), bounds)
        .with_margin(0.1)
        .with_dot_radius(2);
    render_store_to_png(&store, &rc, "dots-layer-areas.png")?;
    Ok(())
}
