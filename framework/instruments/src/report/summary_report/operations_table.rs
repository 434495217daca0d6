use tabled::Tabled;

#[derive(Tabled)]
pub struct OperationRow {
    pub description: String,
    pub attempts: usize,
    pub failed: usize,
    #[tabled(display("float2"))]
    pub total_ms: f64,
    #[tabled(display("float2"))]
    pub avg_ms: f64,
    #[tabled(display("float2"))]
    pub min_ms: f64,
    #[tabled(display("float2"))]
    pub max_ms: f64,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}
