use rand::seq::SliceRandom;
use rand::Rng;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;
/// Converts burst speed units into rows per second
const SPEED_SCALE: f64 = 0.3;
const GRAVITY: f64 = 15.0;
const DRAG: f64 = 0.98;
const OFF_SCREEN_BUFFER: f64 = 5.0;

const SYMBOLS: [char; 6] = ['▪', '●', '◆', '▴', '•', '*'];

/// Shape of one confetti burst
#[derive(Debug, Clone, PartialEq)]
pub struct BurstConfig {
    /// Emission point relative to the drawing area, (0,0) top-left
    pub origin: (f64, f64),
    /// Degrees, 90 points straight up
    pub angle: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Total cone width in degrees
    pub spread: f64,
    /// Seconds to wait before the first particle
    pub delay: f64,
    /// Seconds the emitter keeps producing particles
    pub emit_duration: f64,
    pub max_particles: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            origin: (0.5, 1.0),
            angle: 90.0,
            min_speed: 50.0,
            max_speed: 100.0,
            spread: 55.0,
            delay: 0.5,
            emit_duration: 4.0,
            max_particles: 300,
        }
    }
}

/// Single confetti piece
#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn launch(x: f64, y: f64, config: &BurstConfig, rng: &mut impl Rng) -> Self {
        let half_spread = config.spread / 2.0;
        let angle = (config.angle + rng.gen_range(-half_spread..=half_spread)).to_radians();
        let speed = rng.gen_range(config.min_speed..=config.max_speed) * SPEED_SCALE;

        Self {
            x,
            y,
            vel_x: angle.cos() * speed * CELL_ASPECT,
            // screen rows grow downwards
            vel_y: -angle.sin() * speed,
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..3.5),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_x *= DRAG;
        self.vel_y += GRAVITY * dt;

        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when fresh, 0.0 at end of life
    pub fn freshness(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// A timed burst of confetti over the whole screen
#[derive(Debug)]
pub struct ConfettiBurst {
    pub config: BurstConfig,
    pub particles: Vec<ConfettiParticle>,
    pub is_active: bool,
    pub area_width: f64,
    pub area_height: f64,
    clock: f64,
    emitted: usize,
}

impl ConfettiBurst {
    pub fn new(config: BurstConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            is_active: false,
            area_width: 80.0,
            area_height: 24.0,
            clock: 0.0,
            emitted: 0,
        }
    }

    /// Restarts the burst from scratch, dropping anything still in flight
    pub fn start(&mut self, width: u16, height: u16) {
        self.particles.clear();
        self.is_active = true;
        self.clock = 0.0;
        self.emitted = 0;
        self.resize(width, height);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area_width = width as f64;
        self.area_height = height as f64;
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.clock += dt;
        self.emit_due();

        let (width, height) = (self.area_width, self.area_height);
        self.particles.retain_mut(|particle| {
            let still_alive = particle.update(dt);
            let off_screen = particle.y > height + OFF_SCREEN_BUFFER
                || particle.x < -OFF_SCREEN_BUFFER
                || particle.x > width + OFF_SCREEN_BUFFER;
            still_alive && !off_screen
        });

        let emission_over = self.clock >= self.config.delay + self.config.emit_duration;
        if emission_over && self.particles.is_empty() {
            self.is_active = false;
        }
    }

    /// Spreads `max_particles` evenly across the emission window
    fn emit_due(&mut self) {
        let since_delay = self.clock - self.config.delay;
        if since_delay < 0.0 {
            return;
        }

        let progress = if self.config.emit_duration > 0.0 {
            (since_delay / self.config.emit_duration).min(1.0)
        } else {
            1.0
        };
        let target = ((progress * self.config.max_particles as f64).ceil() as usize)
            .min(self.config.max_particles);

        let origin_x = self.config.origin.0 * self.area_width;
        let origin_y = self.config.origin.1 * self.area_height;
        let mut rng = rand::thread_rng();
        while self.emitted < target {
            self.particles.push(ConfettiParticle::launch(
                origin_x,
                origin_y,
                &self.config,
                &mut rng,
            ));
            self.emitted += 1;
        }
    }
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self::new(BurstConfig::default())
    }
}
