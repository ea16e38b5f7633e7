use std::fmt;

/// Identity of an external payment-processor gateway. The default gateway is
/// always preferred when healthy; the fallback is the contingency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayType {
	Default,
	Fallback,
}

impl GatewayType {
	pub const ALL: [GatewayType; 2] = [GatewayType::Default, GatewayType::Fallback];

	pub fn as_str(&self) -> &'static str {
		match self {
			GatewayType::Default => "default",
			GatewayType::Fallback => "fallback",
		}
	}

	/// Key under which this gateway's health snapshot is persisted.
	pub fn health_key(&self) -> &'static str {
		match self {
			GatewayType::Default => "payment-processor",
			GatewayType::Fallback => "payment-processor-fallback",
		}
	}

	pub fn from_name(name: &str) -> Option<GatewayType> {
		match name {
			"default" => Some(GatewayType::Default),
			"fallback" => Some(GatewayType::Fallback),
			_ => None,
		}
	}
}

impl fmt::Display for GatewayType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The routing decision for a single payment attempt. Ephemeral, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySelection {
	pub gateway:  GatewayType,
	pub endpoint: String,
}
