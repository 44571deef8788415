use crc32fast::Hasher;

/// Derive a stable block-id seed from a template name using CRC32
pub fn get_template_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(format!("template://{}", name).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks within a document
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String, // Template seed (CRC32)
    count: u32,   // Sequential counter
}

impl IDGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_template_seed(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate the next ID not rejected by `taken`.
    ///
    /// Documents loaded from disk may already hold ids from this sequence.
    pub fn new_id_avoiding(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Get the seed shared by every generated ID
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IDGenerator {
    fn default() -> Self {
        Self::from_seed("blk".to_string())
    }
}
