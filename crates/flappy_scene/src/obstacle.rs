use flappy_common::{Driver, Flip, Rect, Result, TextureId};
use rand::Rng;

use crate::SceneConfig;

/// A pipe pair scrolling from right to left with a gap the bird has to fly
/// through.
#[derive(Clone, Debug)]
pub struct Obstacle {
    x: f32,
    gap_center: f32,
    gap_height: f32,
    width: f32,
    floor: f32,
    /// Range of gap centers that keeps the whole gap inside the playfield.
    gap_min: f32,
    gap_max: f32,
    scored: bool,
}

impl Obstacle {
    pub fn new<R: Rng>(config: &SceneConfig, x: f32, rng: &mut R) -> Self {
        let half_gap = config.obstacle_gap / 2.0;
        let gap_min = config.obstacle_margin + half_gap;
        let gap_max = (config.height - config.obstacle_margin - half_gap).max(gap_min);
        let mut obstacle = Self {
            x,
            gap_center: gap_min,
            gap_height: config.obstacle_gap,
            width: config.obstacle_width,
            floor: config.height,
            gap_min,
            gap_max,
            scored: false,
        };
        obstacle.restart(x, rng);
        obstacle
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        self.x -= speed * dt;
    }

    /// Reuse this obstacle at `x` with a freshly drawn gap.
    pub fn restart<R: Rng>(&mut self, x: f32, rng: &mut R) {
        self.x = x;
        self.gap_center = if self.gap_max > self.gap_min {
            rng.gen_range(self.gap_min..=self.gap_max)
        } else {
            self.gap_min
        };
        self.scored = false;
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_top())
    }

    pub fn bottom_rect(&self) -> Rect {
        let bottom = self.gap_bottom();
        Rect::new(self.x, bottom, self.width, self.floor - bottom)
    }

    /// Whether `bounds` overlaps either pipe, as opposed to sitting in the gap
    /// or beside the obstacle.
    pub fn touches(&self, bounds: &Rect) -> bool {
        bounds.intersects(&self.top_rect()) || bounds.intersects(&self.bottom_rect())
    }

    /// True exactly once per pass: the first time the obstacle's right edge is
    /// left of `actor_x` since the last restart.
    pub fn passed(&mut self, actor_x: f32) -> bool {
        if self.scored || self.right() >= actor_x {
            return false;
        }
        self.scored = true;
        true
    }

    /// Fully past the left edge of the screen.
    pub fn is_gone(&self) -> bool {
        self.right() < 0.0
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap_center(&self) -> f32 {
        self.gap_center
    }

    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    /// The sprite is an upright pipe; the top one is drawn flipped.
    pub fn draw(&self, driver: &mut dyn Driver, texture: TextureId) -> Result<()> {
        driver.draw_texture(texture, None, Some(self.top_rect()), Flip::Vertical)?;
        driver.draw_texture(texture, None, Some(self.bottom_rect()), Flip::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn obstacle(x: f32) -> Obstacle {
        let mut rng = StdRng::seed_from_u64(7);
        Obstacle::new(&SceneConfig::default(), x, &mut rng)
    }

    #[test]
    fn scrolls_left() {
        let mut o = obstacle(500.0);
        o.update(0.5, 200.0);
        assert_eq!(o.x(), 400.0);
        o.update(0.0, 200.0);
        assert_eq!(o.x(), 400.0);
    }

    #[test]
    fn gap_stays_reachable() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut o = Obstacle::new(&config, 0.0, &mut rng);
        for _ in 0..500 {
            o.restart(900.0, &mut rng);
            assert!(o.gap_top() >= config.obstacle_margin - 1e-3);
            assert!(o.gap_bottom() <= config.height - config.obstacle_margin + 1e-3);
            assert!((o.gap_bottom() - o.gap_top() - config.obstacle_gap).abs() < 1e-3);
        }
    }

    #[test]
    fn restart_draws_new_gaps() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut o = Obstacle::new(&SceneConfig::default(), 0.0, &mut rng);
        let first = o.gap_center();
        let changed = (0..20).any(|_| {
            o.restart(900.0, &mut rng);
            o.gap_center() != first
        });
        assert!(changed);
        assert_eq!(o.x(), 900.0);
    }

    #[test]
    fn degenerate_gap_range_is_centered_on_minimum() {
        let config = SceneConfig::builder()
            .height(100.0)
            .obstacle_gap(90.0)
            .obstacle_margin(20.0)
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        let o = Obstacle::new(&config, 0.0, &mut rng);
        assert_eq!(o.gap_center(), 65.0);
    }

    #[test]
    fn touches_pipes_but_not_gap() {
        let o = obstacle(100.0);
        let in_gap = Rect::new(110.0, o.gap_top() + 5.0, 20.0, 20.0);
        assert!(!o.touches(&in_gap));

        let in_top = Rect::new(110.0, o.gap_top() - 10.0, 20.0, 20.0);
        assert!(o.touches(&in_top));

        let in_bottom = Rect::new(110.0, o.gap_bottom() - 10.0, 20.0, 20.0);
        assert!(o.touches(&in_bottom));

        let beside = Rect::new(o.right(), 0.0, 20.0, 600.0);
        assert!(!o.touches(&beside));
    }

    #[test]
    fn passed_fires_once_per_pass() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut o = Obstacle::new(&SceneConfig::default(), 200.0, &mut rng);
        let actor_x = 100.0;

        let mut fired = 0;
        for _ in 0..200 {
            o.update(1.0 / 60.0, 200.0);
            if o.passed(actor_x) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        o.restart(200.0, &mut rng);
        assert!(!o.passed(actor_x));
        for _ in 0..200 {
            o.update(1.0 / 60.0, 200.0);
            if o.passed(actor_x) {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn gone_once_right_edge_leaves_screen() {
        let mut o = obstacle(0.0);
        assert!(!o.is_gone());
        o.update(1.0, 50.0);
        assert!(!o.is_gone());
        o.update(1.0, 1.0);
        assert!(o.is_gone());
    }
}
