//! `DieselAppointmentRepository` and `DieselHospitalRepository` against
//! embedded PostgreSQL.
//!
//! Covers the writes that rely on the database for correctness: the
//! lock-count-insert admission transaction and the hospital delete cascade.
//! Each test runs on its own database cloned from the migrated template.
//!
//! The cluster helpers block on their own runtime, so tests stay synchronous
//! and drive the async adapters through a per-test Tokio runtime.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use futures::future::join_all;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use vaxbook::domain::ports::{AppointmentRepository, HospitalRepository, StoredUser, UserRepository};
use vaxbook::domain::{
    Admission, Appointment, AppointmentId, BOOKING_LIMIT, EmailAddress, Hospital, HospitalId,
    Role, User, UserId, UserName,
};
use vaxbook::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselHospitalRepository, DieselUserRepository,
    PoolConfig,
};

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{handle_cluster_setup_failure, provision_database, shared_cluster};

struct DbContext {
    runtime: Runtime,
    users: DieselUserRepository,
    hospitals: DieselHospitalRepository,
    appointments: Arc<DieselAppointmentRepository>,
    _database: TemporaryDatabase,
}

impl DbContext {
    fn add_user(&self, role: Role) -> UserId {
        let id = UserId::random();
        let record = StoredUser {
            user: User {
                id,
                name: UserName::new("Somsri").expect("valid name"),
                email: EmailAddress::new(format!("{}@example.com", id)).expect("valid email"),
                role,
                created_at: Utc::now(),
            },
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
        };
        self.runtime
            .block_on(self.users.insert(&record))
            .expect("insert user");
        id
    }

    fn add_hospital(&self, name: &str) -> HospitalId {
        let hospital = Hospital {
            id: HospitalId::random(),
            name: name.to_owned(),
            address: "270 Rama VI Rd".to_owned(),
            district: "Ratchathewi".to_owned(),
            province: "Bangkok".to_owned(),
            postalcode: "10400".to_owned(),
            tel: Some("02-201-1000".to_owned()),
            region: "Central".to_owned(),
            created_at: Utc::now(),
        };
        self.runtime
            .block_on(self.hospitals.insert(&hospital))
            .expect("insert hospital");
        hospital.id
    }

    fn admit(&self, owner: UserId, hospital: HospitalId, limit: Option<usize>) -> Admission {
        self.runtime
            .block_on(
                self.appointments
                    .insert_within_limit(&booking(owner, hospital), limit),
            )
            .expect("admission write")
    }

    fn count_for(&self, owner: UserId) -> usize {
        self.runtime
            .block_on(self.appointments.list(Some(owner)))
            .expect("list appointments")
            .len()
    }
}

fn booking(owner: UserId, hospital: HospitalId) -> Appointment {
    Appointment {
        id: AppointmentId::random(),
        user: owner,
        hospital,
        appt_date: Utc
            .with_ymd_and_hms(2026, 11, 2, 9, 30, 0)
            .single()
            .expect("valid date"),
        created_at: Utc::now(),
    }
}

fn setup_context() -> Result<DbContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(8)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(DbContext {
        runtime,
        users: DieselUserRepository::new(pool.clone()),
        hospitals: DieselHospitalRepository::new(pool.clone()),
        appointments: Arc::new(DieselAppointmentRepository::new(pool)),
        _database: database,
    })
}

#[fixture]
fn db() -> Option<DbContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn fourth_booking_is_refused_and_not_stored(db: Option<DbContext>) {
    let Some(ctx) = db else { return };
    let owner = ctx.add_user(Role::User);
    let hospital = ctx.add_hospital("Chulalongkorn");

    for _ in 0..BOOKING_LIMIT {
        let admission = ctx.admit(owner, hospital, Some(BOOKING_LIMIT));
        assert!(matches!(admission, Admission::Admitted(_)), "{admission:?}");
    }
    let refused = ctx.admit(owner, hospital, Some(BOOKING_LIMIT));

    assert_eq!(refused, Admission::CapacityReached { existing: 3 });
    assert_eq!(ctx.count_for(owner), 3);
}

#[rstest]
fn limit_counts_only_the_owners_bookings(db: Option<DbContext>) {
    let Some(ctx) = db else { return };
    let busy = ctx.add_user(Role::User);
    let fresh = ctx.add_user(Role::User);
    let hospital = ctx.add_hospital("Siriraj");
    for _ in 0..BOOKING_LIMIT {
        ctx.admit(busy, hospital, Some(BOOKING_LIMIT));
    }

    let admission = ctx.admit(fresh, hospital, Some(BOOKING_LIMIT));

    assert!(matches!(admission, Admission::Admitted(_)));
    assert_eq!(ctx.count_for(fresh), 1);
}

#[rstest]
fn unlimited_admission_keeps_accepting(db: Option<DbContext>) {
    let Some(ctx) = db else { return };
    let admin = ctx.add_user(Role::Admin);
    let hospital = ctx.add_hospital("Ramathibodi");

    for _ in 0..5 {
        let admission = ctx.admit(admin, hospital, None);
        assert!(matches!(admission, Admission::Admitted(_)));
    }
    assert_eq!(ctx.count_for(admin), 5);
}

#[rstest]
fn concurrent_bookings_admit_exactly_the_limit(db: Option<DbContext>) {
    let Some(ctx) = db else { return };
    let owner = ctx.add_user(Role::User);
    let hospital = ctx.add_hospital("Vajira");

    let repository = Arc::clone(&ctx.appointments);
    let outcomes = ctx.runtime.block_on(async move {
        let attempts = (0..16).map(|_| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .insert_within_limit(&booking(owner, hospital), Some(BOOKING_LIMIT))
                    .await
            })
        });
        join_all(attempts).await
    });

    let admitted = outcomes
        .into_iter()
        .map(|joined| joined.expect("task completes").expect("admission write"))
        .filter(|admission| matches!(admission, Admission::Admitted(_)))
        .count();
    assert_eq!(admitted, BOOKING_LIMIT);
    assert_eq!(ctx.count_for(owner), BOOKING_LIMIT);
}

#[rstest]
fn deleting_a_hospital_removes_its_appointments(db: Option<DbContext>) {
    let Some(ctx) = db else { return };
    let owner = ctx.add_user(Role::User);
    let closing = ctx.add_hospital("Rajavithi");
    let staying = ctx.add_hospital("Police General");
    ctx.admit(owner, closing, Some(BOOKING_LIMIT));
    ctx.admit(owner, staying, Some(BOOKING_LIMIT));

    let removed = ctx
        .runtime
        .block_on(ctx.hospitals.delete(&closing))
        .expect("delete hospital");

    assert!(removed);
    let remaining = ctx
        .runtime
        .block_on(ctx.appointments.list(Some(owner)))
        .expect("list appointments");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].appointment.hospital, staying);
    let summary = remaining[0].hospital.as_ref().expect("hospital resolves");
    assert_eq!(summary.name, "Police General");
}

#[rstest]
fn deleting_an_unknown_hospital_reports_nothing_removed(db: Option<DbContext>) {
    let Some(ctx) = db else { return };

    let removed = ctx
        .runtime
        .block_on(ctx.hospitals.delete(&HospitalId::random()))
        .expect("delete hospital");

    assert!(!removed);
}
