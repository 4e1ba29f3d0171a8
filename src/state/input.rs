use ml_core::Measurements;

/// Upper bound of every field, in tenths of a centimeter.
const MAX_TENTHS: i32 = 100;

const DEFAULT_TENTHS: [u16; 4] = [50, 30, 40, 10];

/// One of the four measurement fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::SepalLength,
        Field::SepalWidth,
        Field::PetalLength,
        Field::PetalWidth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::SepalLength => "Sepal length (cm)",
            Field::SepalWidth => "Sepal width (cm)",
            Field::PetalLength => "Petal length (cm)",
            Field::PetalWidth => "Petal width (cm)",
        }
    }

    fn index(self) -> usize {
        match self {
            Field::SepalLength => 0,
            Field::SepalWidth => 1,
            Field::PetalLength => 2,
            Field::PetalWidth => 3,
        }
    }

    /// Field above, saturating at the first one.
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Field below, saturating at the last one.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

/// The four inputs, stored in tenths so they always sit on the 0.1 grid.
///
/// Being integers, they compare exactly, which makes them usable as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inputs {
    tenths: [u16; 4],
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            tenths: DEFAULT_TENTHS,
        }
    }
}

impl Inputs {
    pub fn get(&self, field: Field) -> f64 {
        f64::from(self.tenths[field.index()]) / 10.0
    }

    /// Moves `field` by `delta` tenths, clamped into `[0.0, 10.0]`.
    pub fn step(&mut self, field: Field, delta: i32) {
        let v = i32::from(self.tenths[field.index()]) + delta;
        self.tenths[field.index()] = v.clamp(0, MAX_TENTHS) as u16;
    }

    /// Sets `field` to `value`, snapped to the nearest tenth and clamped into range.
    /// Non-finite values are ignored.
    pub fn set(&mut self, field: Field, value: f64) {
        if !value.is_finite() {
            return;
        }
        let snapped = (value * 10.0).round().clamp(0.0, f64::from(MAX_TENTHS));
        self.tenths[field.index()] = snapped as u16;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn measurements(&self) -> Measurements {
        Measurements::new(
            self.get(Field::SepalLength),
            self.get(Field::SepalWidth),
            self.get(Field::PetalLength),
            self.get(Field::PetalWidth),
        )
    }
}

/// Text typed into a field while editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Editor {
    buffer: String,
}

impl Editor {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Accepts digits and a single decimal point.
    pub fn push(&mut self, c: char) {
        let is_point = c == '.';
        if c.is_ascii_digit() || (is_point && !self.buffer.contains('.')) {
            self.buffer.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    /// Parses the typed text.
    ///
    /// # Errors
    /// Returns a short hint for the user if the text is not a number.
    pub fn parse(&self) -> Result<f64, String> {
        let text = self.buffer.trim();
        if text.is_empty() {
            return Err("type a value between 0.0 and 10.0".into());
        }
        text.parse::<f64>()
            .map_err(|_| format!("'{text}' is not a number"))
    }
}
