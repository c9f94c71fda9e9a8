use polka_dots::prelude::*;
use polka_dots_examples::{init_tracing, render_store_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A hiking route plus a curved approach arc around a summit.
    let route = vec![
        GeoPoint::new(47.420, 10.980),
        GeoPoint::new(47.428, 10.995),
        GeoPoint::new(47.424, 11.012),
        GeoPoint::new(47.433, 11.030),
    ];
    let mut store = MemoryStore::new();
    store.add_layer("routes", "Routes");
    store.insert(
        Entity::new("route", Location::Line(LineLocation::new(route.clone())))
            .with_name("Route")
            .with_container("routes")
            .with_visual_attributes(VisualAttributes {
                fill_color: None,
                line_color: Some(Color::from_argb(255, 200, 40, 40)),
            }),
    );
    store.insert(
        Entity::new(
            "approach",
            Location::Arc(ArcLocation::new(route[3], 800.0, 180.0, 120.0)),
        )
        .with_name("Approach")
        .with_container("routes"),
    );

    let mut rng = StdRng::seed_from_u64(7);

    // Route: entity colour and name, numbered from 1 every 250 m.
    store.select(Some("route"));
    let inputs = DotsInputs {
        distance: "250".into(),
        color_from_entity: true,
        prefix_from_entity: true,
        ..Default::default()
    };
    let outcome = run_selected_with_inputs(&mut store, &inputs, &mut rng, None)?;
    tracing::info!("route: {outcome:?}");

    // Arc: fixed style, numbered backwards, replacing the arc itself.
    store.select(Some("approach"));
    let config = DotsConfig::new(150.0)
        .with_prefix(PrefixSource::Fixed("A".into()))
        .with_color(ColorSource::Fixed(Color::from_argb(255, 30, 90, 200)))
        .with_reversed_order(true)
        .with_delete_source(true);
    let mut runner = DotsRunner::try_new(config, &mut store)?;
    let outcome = runner.run_selected(&mut rng)?;
    tracing::info!("approach: {outcome:?}");

    let Some(bounds) = GeoBox::from_points(&route) else {
        anyhow::bail!("route has no points");
    };
    let rc = RenderConfig::new((1000, 1000), bounds).with_margin(0.15);
    render_store_to_png(&store, &rc, "dots-along-route.png")?;
    Ok(())
}
