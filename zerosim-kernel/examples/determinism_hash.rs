use zerosim_kernel::api;
use zerosim_kernel::{AuditSession, FixedPointValue};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fp = FixedPointValue::from_decimal_string;
    let mut session = AuditSession::new();
    let log = &mut session;

    let a = fp("1.5")?;
    let b = fp("2.25")?;
    let sum = api::add(Some(&mut *log), a, b)?;
    let product = api::mul(Some(&mut *log), sum, b)?;
    let quotient = api::div(Some(&mut *log), product, a)?;
    api::gt(Some(&mut *log), quotient, sum)?;
    api::sqrt(Some(&mut *log), quotient, None)?;
    api::phi_series(Some(&mut *log), a, Some(10))?;
    api::exp(Some(&mut *log), fp("1")?, None)?;
    api::ln(Some(&mut *log), fp("10")?, None)?;
    api::sin(Some(&mut *log), fp("0.5")?, None)?;
    api::cos(Some(&mut *log), fp("0.5")?, None)?;
    api::tanh(Some(&mut *log), fp("0.75")?, None)?;
    api::sigmoid(Some(&mut *log), fp("2")?, None)?;
    api::erf(Some(&mut *log), fp("1")?, None)?;
    api::pow(Some(&mut *log), fp("2")?, fp("0.5")?, None)?;

    println!("SESSION_HASH {}", session.session_hash()?);
    Ok(())
}
