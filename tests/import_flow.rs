use tradelog::import::{ImportDefaults, ImportSession, ImportStep, TargetField};
use tradelog::models::Account;
use tradelog::notify::LogNotifier;
use tradelog::store::{AccountStore, SqliteStore};

const CSV: &str = "\
Symbol,Date,Type,Entry,Exit,Size,Stop,Target,Fees,Market
AAPL,01/15/2024,Long,100,110,10,95,120,1,futures
EURUSD,2024-01-16,sell,\"1,1050\",\"1,1000\",2,\"1,1100\",\"1,0900\",0,fx
MSFT,01/17/2024,Long,0,400,5,,,0,stocks
,01/18/2024,Long,50,60,1,,,0,stocks
";

fn mapped_session() -> ImportSession {
    let mut session = ImportSession::new();
    session.upload(CSV).unwrap();
    session
        .set_defaults(ImportDefaults {
            tick_value: 5.0,
            pip_value: 10.0,
            commission: 0.0,
        })
        .unwrap();

    for (field, column) in [
        (TargetField::Symbol, "Symbol"),
        (TargetField::Date, "Date"),
        (TargetField::Type, "Type"),
        (TargetField::Entry, "Entry"),
        (TargetField::Exit, "Exit"),
        (TargetField::Size, "Size"),
        (TargetField::Sl, "Stop"),
        (TargetField::Tp, "Target"),
        (TargetField::Commission, "Fees"),
        (TargetField::MarketType, "Market"),
    ] {
        session.map_column(field, column).unwrap();
    }
    session
}

#[tokio::test]
async fn full_import_flow_against_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");
    let store = SqliteStore::open(path.to_str().unwrap()).unwrap();

    // Two target accounts.
    let main = Account::new("Main", "ProBroker", 10_000.0);
    let swing = Account::new("Swing", "ProBroker", 2_500.0);
    let (main_id, swing_id) = (main.id.clone(), swing.id.clone());
    store.put_accounts("local", &[main, swing]).await.unwrap();

    let mut session = mapped_session();
    session.process().unwrap();

    // Rows 4 (zero entry) and 5 (blank symbol) are rejected, at their
    // 1-based display positions.
    assert_eq!(session.valid_trades().len(), 2);
    let rejected: Vec<usize> = session.row_errors().iter().map(|e| e.row).collect();
    assert_eq!(rejected, vec![4, 5]);
    assert!(
        session.row_errors()[0]
            .errors
            .contains(&"Entry price must be greater than zero".to_string())
    );

    // AAPL: (110-100)*5*10 - 1*10 = 490. EURUSD short, quoted comma
    // decimals: (1.1050-1.1000)/0.0001*10*2 = 1000.
    let total_pnl: f64 = session.valid_trades().iter().map(|t| t.pnl).sum();
    assert!((total_pnl - 1490.0).abs() < 1e-6);

    session.proceed_to_confirm().unwrap();
    session
        .select_accounts(vec![main_id.clone(), swing_id.clone()])
        .unwrap();

    let outcome = session.commit(&store, &LogNotifier, "local").await.unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.accounts.len(), 2);
    assert!(outcome.accounts.contains(&"Main".to_string()));
    assert!(outcome.accounts.contains(&"Swing".to_string()));
    assert_eq!(session.step(), ImportStep::Complete);

    // N valid trades into 2 accounts: 2N records, each balance bumped by
    // the full summed P&L independently.
    let accounts = store.fetch_accounts("local").await.unwrap();
    let main = accounts.iter().find(|a| a.id == main_id).unwrap();
    let swing = accounts.iter().find(|a| a.id == swing_id).unwrap();
    assert_eq!(main.trades.len(), 2);
    assert_eq!(swing.trades.len(), 2);
    assert!((main.balance - 11_490.0).abs() < 1e-6);
    assert!((swing.balance - 3_990.0).abs() < 1e-6);

    // Persisted field fidelity for the AAPL row.
    let aapl = main.trades.iter().find(|t| t.symbol == "AAPL").unwrap();
    assert_eq!(aapl.stop_loss, Some(95.0));
    assert_eq!(aapl.take_profit, Some(120.0));
    assert_eq!(aapl.commission, 1.0);
}

#[tokio::test]
async fn reimport_appends_without_disturbing_existing_trades() {
    let store = SqliteStore::in_memory().unwrap();
    let account = Account::new("Main", "ProBroker", 0.0);
    let account_id = account.id.clone();
    store.put_accounts("local", &[account]).await.unwrap();

    for _ in 0..2 {
        let mut session = mapped_session();
        session.process().unwrap();
        session.proceed_to_confirm().unwrap();
        session.select_accounts(vec![account_id.clone()]).unwrap();
        session.commit(&store, &LogNotifier, "local").await.unwrap();
    }

    let accounts = store.fetch_accounts("local").await.unwrap();
    assert_eq!(accounts[0].trades.len(), 4);

    // Every appended record carries its own identifier.
    let mut ids: Vec<&str> = accounts[0].trades.iter().map(|t| t.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}
