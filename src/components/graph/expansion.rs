use std::collections::BTreeSet;

/// Ids of nodes whose children are currently shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionSet(BTreeSet<String>);

impl ExpansionSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.0.contains(id)
	}

	/// Returns `true` if the node was not already expanded.
	pub fn expand(&mut self, id: &str) -> bool {
		self.0.insert(id.to_owned())
	}

	/// Returns `true` if the node was expanded.
	pub fn collapse(&mut self, id: &str) -> bool {
		self.0.remove(id)
	}

	/// Flip the node's state and return whether it is now expanded.
	pub fn toggle(&mut self, id: &str) -> bool {
		if self.collapse(id) {
			false
		} else {
			self.expand(id)
		}
	}

	pub fn clear(&mut self) {
		self.0.clear();
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

impl<S: Into<String>> FromIterator<S> for ExpansionSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl<S: Into<String>> Extend<S> for ExpansionSet {
	fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
		self.0.extend(iter.into_iter().map(Into::into));
	}
}
