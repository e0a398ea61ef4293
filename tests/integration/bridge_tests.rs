//! End-to-end tests over the in-process bridge: controller and display
//! adapter on one side, the matrix simulator on the other.

use futures_lite::future::{block_on, or};

use cortex_matrix::adapters::{BridgeDisplay, MatrixSimulator, SharedFramebuffer};
use cortex_matrix::app::ports::DisplaySink;
use cortex_matrix::bridge::channel_bridge;
use cortex_matrix::config::MatrixConfig;
use cortex_matrix::error::Error;
use cortex_matrix::frame::{RenderFrame, Shape, WHITE};
use cortex_matrix::matrix::{MatrixController, SpriteId};

/// Run `session` against a simulator over a fresh bridge.
fn with_simulator<T>(
    session: impl AsyncFnOnce(cortex_matrix::bridge::ChannelBridge) -> T,
) -> (T, SharedFramebuffer) {
    let (client, endpoint) = channel_bridge();
    let framebuffer = SharedFramebuffer::new();
    let mut simulator = MatrixSimulator::new(framebuffer.clone());
    let out = block_on(or(session(client), async {
        simulator.run(&endpoint).await;
        unreachable!("simulator never returns")
    }));
    (out, framebuffer)
}

#[test]
fn controller_drives_the_simulated_matrix() {
    let (result, fb) = with_simulator(async |client| {
        let mut matrix = MatrixController::new(client, &MatrixConfig::default());
        matrix.set_background((0, 0, 40)).await?;
        matrix.draw_pixel(1, 2, WHITE).await?;
        matrix.draw_line((0, 10), (9, 10), (255, 0, 0)).await?;
        matrix.set_brightness(250).await?;
        Ok::<_, Error>(())
    });
    assert_eq!(result, Ok(()));
    let frame = fb.snapshot();
    assert_eq!(frame.get(1, 2), Some(WHITE));
    assert_eq!(frame.get(9, 10), Some((255, 0, 0)));
    assert_eq!(frame.get(40, 40), Some((0, 0, 40)));
    assert_eq!(fb.borrow().brightness(), 100);
}

#[test]
fn sprites_round_trip_through_the_registry() {
    let (result, fb) = with_simulator(async |client| {
        let mut matrix = MatrixController::new(client, &MatrixConfig::default());
        let id = matrix.create_sprite(2, 1).await?;
        matrix.update_sprite(&id, &[255, 255, 255, 0, 255, 0]).await?;
        matrix.draw_sprite(&id, 20, 20).await?;
        matrix.start_animation(&id, Some(12)).await?;
        let fps = matrix.sprite(&id).and_then(|s| s.fps);
        matrix.delete_sprite(&id).await?;
        let after = matrix.draw_sprite(&id, 0, 0).await;
        Ok::<_, Error>((id, fps, after))
    });
    let (id, fps, after) = result.unwrap();
    assert_eq!(fps, Some(12));
    assert_eq!(after, Err(Error::UnknownHandle(id)));
    assert_eq!(fb.snapshot().get(21, 20), Some((0, 255, 0)));
}

#[test]
fn unknown_handle_is_an_error_not_a_crash() {
    let (result, _) = with_simulator(async |client| {
        let mut matrix = MatrixController::new(client, &MatrixConfig::default());
        matrix.stop_animation(&SpriteId::new("missing")).await
    });
    assert_eq!(result, Err(Error::UnknownHandle(SpriteId::new("missing"))));
}

#[test]
fn bridge_display_mirrors_frames_onto_the_matrix() {
    let (result, fb) = with_simulator(async |client| {
        let mut display = BridgeDisplay::new(client);
        display.set_image(&RenderFrame::filled((0, 0, 32))).await?;
        display
            .draw_shape(&Shape::Rect {
                x: 4,
                y: 4,
                width: 3,
                height: 3,
                colour: WHITE,
            })
            .await?;
        display.draw_shape(&Shape::text(2, 40, "hello", WHITE)).await
    });
    assert_eq!(result, Ok(()));
    let fb = fb.borrow();
    assert_eq!(fb.frame().get(5, 5), Some(WHITE));
    assert_eq!(fb.frame().get(30, 30), Some((0, 0, 32)));
    assert_eq!(fb.texts().len(), 1);
    assert_eq!(fb.texts()[0].text.as_str(), "hello");
}
