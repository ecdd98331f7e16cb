/// Name given to a group of sensors, so readings from different devices can be told apart.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub struct SensorTag(String);

impl SensorTag {
    pub fn new(tag: &str) -> Self {
        Self(tag.to_string())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let tag = SensorTag::new("test_tag");
        assert_eq!(tag.inner(), "test_tag");
    }

    #[test]
    fn test_partial_ord() {
        let tag1 = SensorTag::new("a_tag");
        let tag2 = SensorTag::new("b_tag");
        assert!(tag1 < tag2);
    }
}
