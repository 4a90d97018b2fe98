use crossterm::style::Color;
use rand::Rng;

/// A single particle in the celebration
#[derive(Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }
}

/// Convert hue (0.0-1.0) to RGB color
pub fn hue_to_rgb(hue: f32) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = (1.0 - (h % 2.0 - 1.0).abs()) * 255.0;

    let (r, g, b) = match h as i32 % 6 {
        0 => (255, x as u8, 0),
        1 => (x as u8, 255, 0),
        2 => (0, 255, x as u8),
        3 => (0, x as u8, 255),
        4 => (x as u8, 0, 255),
        _ => (255, 0, x as u8),
    };

    Color::Rgb { r, g, b }
}

/// Confetti characters
pub const CONFETTI_CHARS: &[char] = &['*', '✦', '✧', '◆', '◇', '○', '●', '■', '□', '▲', '▽'];

const GRAVITY: f32 = 0.08;
const LIFETIME: f32 = 60.0;

/// Confetti burst shown when a puzzle is solved
#[derive(Clone, Default)]
pub struct Confetti {
    particles: Vec<Particle>,
}

impl Confetti {
    /// Launch `count` particles upward from `(x, y)`
    pub fn burst(&mut self, x: f32, y: f32, count: usize) {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.gen_range(-1.6..1.6),
                vy: rng.gen_range(-1.4..-0.3),
                char: CONFETTI_CHARS[rng.gen_range(0..CONFETTI_CHARS.len())],
                color: hue_to_rgb(rng.gen_range(0.0..1.0)),
                lifetime: rng.gen_range(LIFETIME * 0.5..LIFETIME),
            });
        }
    }

    /// Move every particle one frame and drop the expired ones
    pub fn tick(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += GRAVITY;
            p.vx *= 0.98;
            p.lifetime -= 1.0;
        }
        self.particles.retain(|p| p.lifetime > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Particles that fall inside a `width` x `height` screen
    pub fn visible(&self, width: u16, height: u16) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| p.is_visible(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confetti_burns_out() {
        let mut confetti = Confetti::default();
        confetti.burst(40.0, 12.0, 30);
        assert!(confetti.is_active());
        assert!(confetti.visible(80, 24).count() > 0);

        for _ in 0..(LIFETIME as usize + 1) {
            confetti.tick();
        }
        assert!(!confetti.is_active());
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hue_to_rgb(0.0), hue_to_rgb(1.0));
    }
}
