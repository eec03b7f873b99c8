/// Discord snowflakes are stored as decimal strings so they survive databases
/// without an unsigned 64 bit column type.
pub fn id_to_string<T>(value: T) -> String
where
    T: Into<u64>,
{
    let int: u64 = value.into();
    int.to_string()
}
