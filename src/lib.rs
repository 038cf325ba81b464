pub mod json;
pub mod replay;

#[cfg(test)]
mod test;
