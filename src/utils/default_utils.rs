pub(crate) fn default_as_false() -> bool { false }

pub(crate) fn default_as_ten_u64() -> u64 { 10 }

pub(crate) fn default_as_ten_usize() -> usize { 10 }
