use rusqlite::{params, Connection};
use vector_sql::{
    binding::{bind, extract},
    registry::register,
    vector::Vector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Vector Column Demo");
    println!("=====================\n");

    let conn = Connection::open_in_memory()?;

    // Register the vector type once, before any statement touches it
    register(&conn)?;
    println!("✅ Vector type registered on the connection");

    conn.execute(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, embedding vector(3))",
        [],
    )?;

    println!("📊 Inserting embeddings...");
    let mut insert = conn.prepare("INSERT INTO items (embedding) VALUES (?1)")?;
    for values in [[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [1.0, 1.0, 2.0]] {
        bind(&mut insert, 1, Some(&Vector::from_slice(&values)))?;
        insert.raw_execute()?;
    }
    bind(&mut insert, 1, None)?;
    insert.raw_execute()?;
    drop(insert);

    let query = Vector::from_slice(&[1.0, 1.0, 1.0]);
    println!("🔍 Nearest neighbors to {}:", query);

    let mut stmt = conn.prepare(
        "SELECT embedding, l2_distance(embedding, ?1) AS distance
         FROM items
         ORDER BY distance NULLS LAST
         LIMIT 5",
    )?;
    let mut rows = stmt.query(params![&query])?;
    while let Some(row) = rows.next()? {
        match extract(row, 0)? {
            Some(vector) => {
                let distance: f64 = row.get(1)?;
                println!("  {} (distance {:.4})", vector, distance);
            }
            None => println!("  NULL"),
        }
    }

    Ok(())
}
