//! Predictive opponent for the pickleball paddle
//!
//! The opponent never holds a reference to the ball or its paddle; both are
//! passed in each tick.

use rand::Rng;

use super::state::{Ball, Paddle};

/// Noise span (pixels) before scaling by `1 - difficulty`
pub const AIM_NOISE: f32 = 30.0;
/// Upper bound on lookahead steps
const MAX_LOOKAHEAD: usize = 4096;

/// Forward-simulate the ball in a straight line, bouncing off the horizontal
/// walls, until it reaches `target_x`. Returns the predicted centre Y.
///
/// Only meaningful when the ball moves toward `target_x`; otherwise the
/// current Y is returned.
pub fn predict_arrival_y(ball: &Ball, target_x: f32, min_y: f32, max_y: f32) -> f32 {
    let mut pos = ball.pos;
    let mut vel = ball.vel;
    if vel.x <= 0.0 {
        return pos.y;
    }

    let mut steps = 0;
    while pos.x < target_x && steps < MAX_LOOKAHEAD {
        pos += vel;
        if pos.y < min_y + ball.radius || pos.y > max_y - ball.radius {
            vel.y = -vel.y;
        }
        steps += 1;
    }
    pos.y.clamp(min_y, max_y)
}

/// Opponent controller state
#[derive(Debug, Clone)]
pub struct AiOpponent {
    /// Where the paddle's top edge is heading
    pub target_y: f32,
    /// 1.0 = perfect prediction, 0.0 = full noise
    pub difficulty: f32,
}

impl AiOpponent {
    pub fn new(difficulty: f32, rest_y: f32) -> Self {
        Self {
            target_y: rest_y,
            difficulty: difficulty.clamp(0.0, 1.0),
        }
    }

    /// Choose a target and move the paddle toward it.
    ///
    /// Ball approaching: predicted arrival minus half the paddle height, plus
    /// noise. Ball leaving: retreat to the vertical centre of the court.
    pub fn update(
        &mut self,
        paddle: &mut Paddle,
        ball: &Ball,
        min_y: f32,
        max_y: f32,
        rng: &mut impl Rng,
    ) {
        let half = paddle.size.y / 2.0;
        if ball.vel.x > 0.0 {
            let predicted = predict_arrival_y(ball, paddle.pos.x, min_y, max_y);
            let noise = rng.random_range(-AIM_NOISE..AIM_NOISE) * (1.0 - self.difficulty);
            self.target_y = predicted - half + noise;
        } else {
            self.target_y = (min_y + max_y) / 2.0 - half;
        }
        paddle.move_toward(self.target_y, min_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sim::state::Side;

    #[test]
    fn test_straight_prediction() {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 12.0);
        ball.vel = Vec2::new(7.0, 0.0);
        let y = predict_arrival_y(&ball, 715.0, 60.0, 540.0);
        assert!((y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_prediction_bounces_off_wall() {
        let mut ball = Ball::new(Vec2::new(400.0, 100.0), 12.0);
        ball.vel = Vec2::new(10.0, -10.0);
        let y = predict_arrival_y(&ball, 715.0, 60.0, 540.0);
        // Unbounced path would end far above the court
        assert!(y > 60.0);
        assert!(y < 540.0);
    }

    #[test]
    fn test_prediction_when_receding() {
        let mut ball = Ball::new(Vec2::new(400.0, 222.0), 12.0);
        ball.vel = Vec2::new(-7.0, 3.0);
        assert_eq!(predict_arrival_y(&ball, 715.0, 60.0, 540.0), 222.0);
    }

    #[test]
    fn test_retreats_to_center_when_ball_leaves() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut paddle = Paddle::new(Vec2::new(715.0, 60.0), Vec2::new(15.0, 80.0), 8.0, Side::Right);
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 12.0);
        ball.vel = Vec2::new(-7.0, 0.0);
        let mut ai = AiOpponent::new(0.7, 260.0);
        for _ in 0..100 {
            ai.update(&mut paddle, &ball, 60.0, 540.0, &mut rng);
        }
        assert_eq!(ai.target_y, 260.0);
        assert_eq!(paddle.pos.y, 260.0);
    }

    #[test]
    fn test_noise_bounded_by_difficulty() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 12.0);
        ball.vel = Vec2::new(7.0, 0.0);
        let mut ai = AiOpponent::new(0.7, 260.0);
        for _ in 0..200 {
            let mut paddle =
                Paddle::new(Vec2::new(715.0, 260.0), Vec2::new(15.0, 80.0), 8.0, Side::Right);
            ai.update(&mut paddle, &ball, 60.0, 540.0, &mut rng);
            assert!((ai.target_y - 260.0).abs() <= AIM_NOISE * 0.3 + 1e-3);
        }
    }
}
