//! Collision detection and response for paddles, walls and ring targets

use glam::Vec2;

use super::state::{Ball, Paddle, Side};

/// Bounce angle per unit of off-centre contact
pub const BOUNCE_ANGLE_SCALE: f32 = 1.2;
/// Speed gained on every paddle contact
pub const PADDLE_SPEEDUP: f32 = 1.02;

/// Rectangular proximity test: the paddle's horizontal extent widened by the
/// ball radius on the far side, and its vertical extent widened by the
/// radius on both ends
pub fn paddle_contact(ball: &Ball, paddle: &Paddle) -> bool {
    let r = ball.radius;
    paddle.pos.x < ball.pos.x
        && ball.pos.x < paddle.pos.x + paddle.size.x + r
        && paddle.pos.y - r < ball.pos.y
        && ball.pos.y < paddle.pos.y + paddle.size.y + r
}

/// Angle-dependent reflection off a paddle.
///
/// The contact offset from the paddle centre sets the outgoing angle, the
/// speed grows by [`PADDLE_SPEEDUP`] up to `max_speed`, and the ball is moved
/// just outside the paddle face so it cannot re-trigger next tick.
pub fn deflect_off_paddle(ball: &mut Ball, paddle: &Paddle, max_speed: f32) {
    let relative_y = (ball.pos.y - paddle.pos.y) / paddle.size.y - 0.5;
    let angle = relative_y * BOUNCE_ANGLE_SCALE;
    let speed = (ball.speed() * PADDLE_SPEEDUP).min(max_speed);

    let dir = paddle.side.outward();
    ball.vel = Vec2::new(dir * (speed * angle.cos()).abs(), speed * angle.sin());
    ball.pos.x = match paddle.side {
        Side::Left => paddle.pos.x + paddle.size.x + ball.radius,
        Side::Right => paddle.pos.x - ball.radius,
    };
}

/// Reflect `vy` when the ball crosses the band `[min_y, max_y]` and pull the
/// ball back inside so it cannot tunnel. Returns true on a bounce.
pub fn reflect_off_walls(ball: &mut Ball, min_y: f32, max_y: f32) -> bool {
    let r = ball.radius;
    if ball.pos.y - r < min_y || ball.pos.y + r > max_y {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.pos.y.clamp(min_y + r, max_y - r);
        true
    } else {
        false
    }
}

/// Index of the innermost ring whose radius still exceeds `dist`.
///
/// `rings` are ordered outer to inner. Returns None when `dist` is outside
/// the outermost ring.
pub fn ring_band(dist: f32, rings: &[f32]) -> Option<usize> {
    rings.iter().rposition(|&r| dist < r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_paddle() -> Paddle {
        Paddle::new(Vec2::new(70.0, 260.0), Vec2::new(15.0, 80.0), 8.0, Side::Left)
    }

    #[test]
    fn test_contact_window() {
        let paddle = left_paddle();
        let mut ball = Ball::new(Vec2::new(80.0, 300.0), 12.0);
        assert!(paddle_contact(&ball, &paddle));

        ball.pos = Vec2::new(96.9, 300.0);
        assert!(paddle_contact(&ball, &paddle));

        ball.pos = Vec2::new(97.5, 300.0);
        assert!(!paddle_contact(&ball, &paddle));

        ball.pos = Vec2::new(80.0, 247.0);
        assert!(!paddle_contact(&ball, &paddle));

        ball.pos = Vec2::new(80.0, 251.0);
        assert!(paddle_contact(&ball, &paddle));
    }

    #[test]
    fn test_center_hit_goes_straight() {
        let paddle = left_paddle();
        let mut ball = Ball::new(Vec2::new(80.0, 300.0), 12.0);
        ball.vel = Vec2::new(-7.0, 0.0);
        deflect_off_paddle(&mut ball, &paddle, 15.0);
        assert!((ball.vel.x - 7.14).abs() < 1e-4);
        assert!(ball.vel.y.abs() < 1e-6);
        assert_eq!(ball.pos.x, 97.0);
    }

    #[test]
    fn test_edge_hit_angles_and_caps_speed() {
        let paddle = Paddle::new(Vec2::new(715.0, 260.0), Vec2::new(15.0, 80.0), 8.0, Side::Right);
        let mut ball = Ball::new(Vec2::new(720.0, 340.0), 12.0);
        ball.vel = Vec2::new(15.0, 0.0);
        deflect_off_paddle(&mut ball, &paddle, 15.0);
        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y > 0.0);
        assert!(ball.speed() <= 15.0 + 1e-4);
        assert_eq!(ball.pos.x, 703.0);
    }

    #[test]
    fn test_wall_reflection_clamps() {
        let mut ball = Ball::new(Vec2::new(400.0, 65.0), 12.0);
        ball.vel = Vec2::new(7.0, -3.0);
        assert!(reflect_off_walls(&mut ball, 60.0, 540.0));
        assert_eq!(ball.vel.y, 3.0);
        assert_eq!(ball.pos.y, 72.0);
        assert!(!reflect_off_walls(&mut ball, 60.0, 540.0));
    }

    #[test]
    fn test_ring_band() {
        let rings = [60.0, 48.0, 36.0, 24.0, 12.0];
        assert_eq!(ring_band(0.0, &rings), Some(4));
        assert_eq!(ring_band(11.9, &rings), Some(4));
        assert_eq!(ring_band(12.0, &rings), Some(3));
        assert_eq!(ring_band(59.0, &rings), Some(0));
        assert_eq!(ring_band(60.0, &rings), None);
    }
}
