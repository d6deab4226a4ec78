/// One entry of a label table
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Integer key stored in label-valued arrays
    pub key: i32,
    /// Display name
    pub name: String,
    /// Red component in [0, 1]
    pub red: f32,
    /// Green component in [0, 1]
    pub green: f32,
    /// Blue component in [0, 1]
    pub blue: f32,
    /// Alpha component in [0, 1]
    pub alpha: f32,
}

impl Label {
    /// Create an opaque white label
    pub fn new(key: i32, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            alpha: 1.0,
        }
    }

    /// Set the RGBA colour
    pub fn with_color(mut self, red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        self.red = red;
        self.green = green;
        self.blue = blue;
        self.alpha = alpha;
        self
    }

    /// RGBA colour as an array
    pub fn rgba(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Whether every colour component lies in [0, 1]
    pub fn has_valid_color(&self) -> bool {
        self.rgba().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

/// Ordered set of labels with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    labels: Vec<Label>,
}

impl LabelTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, replacing (in place) any label with the same key
    pub fn insert(&mut self, label: Label) -> Option<Label> {
        match self.labels.iter_mut().find(|l| l.key == label.key) {
            Some(existing) => Some(std::mem::replace(existing, label)),
            None => {
                self.labels.push(label);
                None
            }
        }
    }

    /// Label with the given key
    pub fn get(&self, key: i32) -> Option<&Label> {
        self.labels.iter().find(|l| l.key == key)
    }

    /// First label with the given name
    pub fn get_by_name(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }
}

impl FromIterator<Label> for LabelTable {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut table = LabelTable::new();
        for label in iter {
            table.insert(label);
        }
        table
    }
}
