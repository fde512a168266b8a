//! End-to-end lifecycle runs against the in-memory mock platform,
//! including the cross-iframe scroll-adjustment path.

use anyhow::Result;
use simulant::platforms::mock::MockPage;
use simulant::{
    ActionCommand, AxisValues, BrowserFlags, Interaction, LifecycleEvent, Simulator,
};
use std::sync::Arc;

#[tokio::test]
async fn click_adjusts_scroll_across_an_iframe_boundary_innermost_first() -> Result<()> {
    let page = MockPage::new(BrowserFlags::chrome());

    // Outer document: a short scroll container hosting the iframe.
    let outer_container = page
        .element("div")
        .style("overflow-y", "auto")
        .rect(0.0, 100.0, 400.0, 220.0)
        .client_size(400.0, 120.0)
        .scroll_size(400.0, 1000.0)
        .insert();
    let iframe = page
        .element("iframe")
        .child_of(&outer_container)
        .rect(0.0, 100.0, 400.0, 700.0)
        .insert();

    // Embedded document: its own scroll container around the target.
    let inner_root = page.embed_document(&iframe);
    let inner_body = page
        .element("body")
        .child_of(&inner_root)
        .rect(0.0, 100.0, 400.0, 700.0)
        .insert();
    let inner_container = page
        .element("div")
        .child_of(&inner_body)
        .style("overflow-y", "auto")
        .rect(0.0, 100.0, 400.0, 250.0)
        .client_size(400.0, 150.0)
        .scroll_size(400.0, 600.0)
        .insert();
    let target = page
        .element("button")
        .child_of(&inner_container)
        .rect(0.0, 500.0, 400.0, 540.0)
        .insert();

    let simulator = Simulator::new(Arc::new(page.clone()));
    let automation =
        simulator.automation(ActionCommand::Click { offset: None }, vec![target.clone()])?;
    let mut events = automation.subscribe();

    let outcome = automation.run(true).await?;

    // Inner container first, then the host document's container, each by
    // its own minimal deficit.
    assert_eq!(
        inner_container.scroll_position()?,
        AxisValues::new(0.0, 270.0)
    );
    assert_eq!(
        outer_container.scroll_position()?,
        AxisValues::new(0.0, 30.0)
    );
    // Both adjustments were observed before the next was computed.
    assert_eq!(page.render_waits(), 2);

    // The click lands at the target's recomputed center, now on the outer
    // container's visible edge.
    assert_eq!(outcome.coordinates, Some((200.0, 220.0)));
    let dispatched = page.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].element, target.object_id());
    assert_eq!(
        dispatched[0].interaction,
        Interaction::Click { point: AxisValues::new(200.0, 220.0) }
    );

    let mut scroll_events = 0;
    while let Ok(event) = events.try_recv() {
        if event == LifecycleEvent::ScrollAdjusted {
            scroll_events += 1;
        }
    }
    assert_eq!(scroll_events, 2);
    Ok(())
}

#[tokio::test]
async fn drag_by_offset_resolves_both_points_after_adjustment() -> Result<()> {
    let page = MockPage::new(BrowserFlags::firefox());
    let container = page
        .element("div")
        .style("overflow-x", "auto")
        .rect(0.0, 0.0, 200.0, 100.0)
        .scroll_size(900.0, 100.0)
        .insert();
    let handle = page
        .element("div")
        .child_of(&container)
        .rect(600.0, 20.0, 640.0, 60.0)
        .insert();

    let simulator = Simulator::new(Arc::new(page.clone()));
    simulator
        .automation(
            ActionCommand::Drag {
                offset: None,
                drag_offset: AxisValues::new(-50.0, 0.0),
            },
            vec![handle],
        )?
        .run(true)
        .await?;

    // Handle center starts at x=620, off the container's right edge
    // (200); the container scrolls left by the 420 deficit, putting the
    // center on that edge.
    assert_eq!(container.scroll_position()?, AxisValues::new(420.0, 0.0));
    let dispatched = page.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(
        dispatched[0].interaction,
        Interaction::Drag {
            from: AxisValues::new(200.0, 40.0),
            to: AxisValues::new(150.0, 40.0),
        }
    );
    Ok(())
}

#[tokio::test]
async fn hover_reports_its_final_coordinates() -> Result<()> {
    let page = MockPage::new(BrowserFlags::default());
    let target = page.element("a").rect(40.0, 40.0, 140.0, 60.0).insert();

    let outcome = Simulator::new(Arc::new(page.clone()))
        .automation(ActionCommand::Hover { offset: None }, vec![target])?
        .run(true)
        .await?;

    assert_eq!(outcome.coordinates, Some((90.0, 50.0)));
    assert_eq!(
        page.dispatched()[0].interaction,
        Interaction::Hover { point: AxisValues::new(90.0, 50.0) }
    );
    Ok(())
}
