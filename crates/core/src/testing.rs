//! In-memory repositories for tests.
//!
//! [`InMemoryDb`] implements every repository trait over one set of tables so
//! joins (avatars, post authors) and delete cascades behave like the
//! database. Writes to a table can be made to fail to exercise compensation.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

use crate::appointment::{Appointment, AppointmentChanges, AppointmentRepository, NewAppointment};
use crate::customer::{Customer, CustomerChanges, CustomerRepository, NewCustomer};
use crate::employee::{Employee, EmployeeChanges, EmployeeRepository, NewEmployee};
use crate::media::{Media, MediaRepository, NewMedia};
use crate::pet::{NewPet, Pet, PetChanges, PetRepository};
use crate::post::{NewPost, Post, PostAuthor, PostChanges, PostRecord, PostRepository};
use crate::resource::{ListParams, MediaSaga, RepositoryError, WithMedia};
use crate::storage::{StagedFile, StorageConfig, StorageProvider, StorageService};
use crate::{JunkCleanup, MediaStore};

/// Base URL used for media URLs in tests.
pub const TEST_BASE_URL: &str = "http://localhost:3333/files/";

/// In-memory tables plus memory storage, wired into a [`MediaSaga`].
#[derive(Clone)]
pub struct Fixture {
    /// Tables.
    pub db: Arc<InMemoryDb>,
    /// Memory-backed storage.
    pub storage: Arc<StorageService>,
    /// Saga over `db` and `storage`.
    pub saga: MediaSaga,
}

impl Fixture {
    /// Fresh tables and storage.
    ///
    /// # Panics
    ///
    /// Panics if the memory operator cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(
            StorageService::from_config(StorageConfig::new(StorageProvider::Memory))
                .expect("memory storage"),
        )
    }

    /// Fresh tables over the given storage.
    #[must_use]
    pub fn with_storage(storage: StorageService) -> Self {
        let db = Arc::new(InMemoryDb::new());
        let storage = Arc::new(storage);
        let media: Arc<dyn MediaRepository> = db.clone();
        let saga = MediaSaga::new(
            Arc::new(MediaStore::new(media.clone(), TEST_BASE_URL)),
            Arc::new(JunkCleanup::new(storage.clone(), media)),
        );
        Self { db, storage, saga }
    }

    /// Write a small PNG to storage as if it had just been uploaded.
    ///
    /// # Panics
    ///
    /// Panics if the write fails.
    pub async fn stage(&self, original_name: &str) -> StagedFile {
        self.storage
            .stage_upload(original_name, "image/png", Bytes::from_static(b"\x89PNG\r\n"))
            .await
            .expect("stage upload")
    }

    /// Whether a stored file exists.
    pub async fn stored(&self, path: &str) -> bool {
        self.storage.exists(path).await
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Table names, used to inject write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Media rows.
    Files,
    /// Customers.
    Customers,
    /// Employees.
    Employees,
    /// Pets.
    Pets,
    /// Posts.
    Posts,
    /// Appointments.
    Appointments,
}

#[derive(Default)]
struct Tables {
    next_id: i32,
    clock: i64,
    files: BTreeMap<i32, Media>,
    customers: BTreeMap<i32, Customer>,
    employees: BTreeMap<i32, Employee>,
    pets: BTreeMap<i32, Pet>,
    posts: BTreeMap<i32, Post>,
    appointments: BTreeMap<i32, Appointment>,
    failing: HashSet<Table>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so ordering tests are deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(self.clock)
    }

    fn check(&self, table: Table) -> Result<(), RepositoryError> {
        if self.failing.contains(&table) {
            return Err(RepositoryError::new(format!("{table:?} writes are failing")));
        }
        Ok(())
    }

    fn media(&self, id: Option<i32>) -> Option<Media> {
        id.and_then(|id| self.files.get(&id).cloned())
    }

    fn post_record(&self, post: &Post) -> PostRecord {
        PostRecord {
            post: post.clone(),
            midia: self.media(post.midia_id),
            author: self.employees.get(&post.employee_id).map(|e| PostAuthor {
                id: e.id,
                name: e.name.clone(),
                avatar: self.media(e.avatar_id),
            }),
        }
    }

    fn delete_pet(&mut self, id: i32) -> bool {
        self.appointments.retain(|_, a| a.pet_id != id);
        self.pets.remove(&id).is_some()
    }
}

/// Shared in-memory tables implementing every repository trait.
#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
}

impl InMemoryDb {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make inserts, updates and deletes on `table` fail (or succeed again).
    pub fn set_failing(&self, table: Table, failing: bool) {
        let mut tables = self.lock();
        if failing {
            tables.failing.insert(table);
        } else {
            tables.failing.remove(&table);
        }
    }

    /// Number of media rows.
    #[must_use]
    pub fn media_count(&self) -> usize {
        self.lock().files.len()
    }

    /// Number of pets.
    #[must_use]
    pub fn pet_count(&self) -> usize {
        self.lock().pets.len()
    }

    /// Number of posts.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    /// Number of customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.lock().customers.len()
    }

    /// Insert a customer directly.
    pub fn seed_customer(&self, name: &str, email: &str) -> Customer {
        let mut t = self.lock();
        let now = t.now();
        let customer = Customer {
            id: t.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            avatar_id: None,
            created_at: now,
            updated_at: now,
        };
        t.customers.insert(customer.id, customer.clone());
        customer
    }

    /// Insert an employee directly.
    pub fn seed_employee(&self, name: &str, email: &str, role: petcare_shared::Role) -> Employee {
        let mut t = self.lock();
        let now = t.now();
        let employee = Employee {
            id: t.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role,
            avatar_id: None,
            created_at: now,
            updated_at: now,
        };
        t.employees.insert(employee.id, employee.clone());
        employee
    }

    /// Insert a pet directly.
    pub fn seed_pet(&self, name: &str, owner_id: i32) -> Pet {
        let mut t = self.lock();
        let now = t.now();
        let pet = Pet {
            id: t.next_id(),
            name: name.to_string(),
            kind: "dog".to_string(),
            sex: "M".to_string(),
            breed: "Mixed".to_string(),
            owner_id,
            avatar_id: None,
            created_at: now,
            updated_at: now,
        };
        t.pets.insert(pet.id, pet.clone());
        pet
    }
}

#[async_trait]
impl MediaRepository for InMemoryDb {
    async fn create(&self, input: NewMedia) -> Result<Media, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Files)?;
        let media = Media {
            id: t.next_id(),
            name: input.name,
            path: input.path,
        };
        t.files.insert(media.id, media.clone());
        Ok(media)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Files)?;
        Ok(t.files.remove(&id).is_some())
    }
}

#[async_trait]
impl PetRepository for InMemoryDb {
    async fn create(&self, input: NewPet) -> Result<Pet, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Pets)?;
        let now = t.now();
        let pet = Pet {
            id: t.next_id(),
            name: input.name,
            kind: input.kind,
            sex: input.sex,
            breed: input.breed,
            owner_id: input.owner_id,
            avatar_id: input.avatar_id,
            created_at: now,
            updated_at: now,
        };
        t.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    async fn find_with_avatar(&self, id: i32) -> Result<Option<WithMedia<Pet>>, RepositoryError> {
        let t = self.lock();
        Ok(t.pets
            .get(&id)
            .map(|p| WithMedia::new(p.clone(), t.media(p.avatar_id))))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Pet>>, RepositoryError> {
        let t = self.lock();
        let rows = t
            .pets
            .values()
            .filter(|p| params.owner.is_none_or(|o| p.owner_id == o))
            .map(|p| (p.created_at, p.id, WithMedia::new(p.clone(), t.media(p.avatar_id))))
            .collect();
        Ok(params.apply(rows))
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<WithMedia<Pet>>, RepositoryError> {
        let t = self.lock();
        Ok(t.pets
            .values()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| WithMedia::new(p.clone(), t.media(p.avatar_id)))
            .collect())
    }

    async fn update(&self, id: i32, changes: PetChanges) -> Result<Option<Pet>, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Pets)?;
        let now = t.now();
        let Some(pet) = t.pets.get_mut(&id) else {
            return Ok(None);
        };
        pet.name = changes.name;
        pet.kind = changes.kind;
        pet.sex = changes.sex;
        pet.breed = changes.breed;
        pet.updated_at = now;
        Ok(Some(pet.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Pets)?;
        Ok(t.delete_pet(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryDb {
    async fn create(&self, input: NewPost) -> Result<Post, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Posts)?;
        let now = t.now();
        let post = Post {
            id: t.next_id(),
            title: input.title,
            employee_id: input.employee_id,
            midia_id: input.midia_id,
            created_at: now,
            updated_at: now,
        };
        t.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_detailed(&self, id: i32) -> Result<Option<PostRecord>, RepositoryError> {
        let t = self.lock();
        Ok(t.posts.get(&id).map(|p| t.post_record(p)))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<PostRecord>, RepositoryError> {
        let t = self.lock();
        let rows = t
            .posts
            .values()
            .filter(|p| params.owner.is_none_or(|o| p.employee_id == o))
            .map(|p| (p.created_at, p.id, t.post_record(p)))
            .collect();
        Ok(params.apply(rows))
    }

    async fn list_by_author(&self, employee_id: i32) -> Result<Vec<PostRecord>, RepositoryError> {
        let t = self.lock();
        Ok(t.posts
            .values()
            .filter(|p| p.employee_id == employee_id)
            .map(|p| t.post_record(p))
            .collect())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Option<Post>, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Posts)?;
        let now = t.now();
        let Some(post) = t.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = Some(title);
        }
        if let Some(midia_id) = changes.midia_id {
            post.midia_id = Some(midia_id);
        }
        post.updated_at = now;
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Posts)?;
        Ok(t.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryDb {
    async fn create(&self, input: NewAppointment) -> Result<Appointment, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Appointments)?;
        let now = t.now();
        let appointment = Appointment {
            id: t.next_id(),
            pet_id: input.pet_id,
            customer_id: input.customer_id,
            employee_id: input.employee_id,
            date: input.date,
            service: input.service,
            created_at: now,
            updated_at: now,
        };
        t.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.lock().appointments.get(&id).cloned())
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<Appointment>, RepositoryError> {
        let t = self.lock();
        let rows = t
            .appointments
            .values()
            .filter(|a| params.owner.is_none_or(|o| a.customer_id == o))
            .map(|a| (a.created_at, a.id, a.clone()))
            .collect();
        Ok(params.apply(rows))
    }

    async fn update(
        &self,
        id: i32,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Appointments)?;
        let now = t.now();
        let Some(appointment) = t.appointments.get_mut(&id) else {
            return Ok(None);
        };
        appointment.pet_id = changes.pet_id;
        appointment.employee_id = changes.employee_id;
        appointment.date = changes.date;
        appointment.service = changes.service;
        appointment.updated_at = now;
        Ok(Some(appointment.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Appointments)?;
        Ok(t.appointments.remove(&id).is_some())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryDb {
    async fn create(&self, input: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Customers)?;
        let now = t.now();
        let customer = Customer {
            id: t.next_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            avatar_id: input.avatar_id,
            created_at: now,
            updated_at: now,
        };
        t.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_with_avatar(
        &self,
        id: i32,
    ) -> Result<Option<WithMedia<Customer>>, RepositoryError> {
        let t = self.lock();
        Ok(t.customers
            .get(&id)
            .map(|c| WithMedia::new(c.clone(), t.media(c.avatar_id))))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .lock()
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Customer>>, RepositoryError> {
        let t = self.lock();
        let rows = t
            .customers
            .values()
            .map(|c| (c.created_at, c.id, WithMedia::new(c.clone(), t.media(c.avatar_id))))
            .collect();
        Ok(params.apply(rows))
    }

    async fn update(
        &self,
        id: i32,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Customers)?;
        let now = t.now();
        let Some(customer) = t.customers.get_mut(&id) else {
            return Ok(None);
        };
        customer.name = changes.name;
        customer.email = changes.email;
        customer.phone = changes.phone;
        customer.updated_at = now;
        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Customers)?;
        let pets: Vec<i32> = t
            .pets
            .values()
            .filter(|p| p.owner_id == id)
            .map(|p| p.id)
            .collect();
        for pet in pets {
            t.delete_pet(pet);
        }
        t.appointments.retain(|_, a| a.customer_id != id);
        Ok(t.customers.remove(&id).is_some())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryDb {
    async fn create(&self, input: NewEmployee) -> Result<Employee, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Employees)?;
        let now = t.now();
        let employee = Employee {
            id: t.next_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            role: input.role,
            avatar_id: input.avatar_id,
            created_at: now,
            updated_at: now,
        };
        t.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_with_avatar(
        &self,
        id: i32,
    ) -> Result<Option<WithMedia<Employee>>, RepositoryError> {
        let t = self.lock();
        Ok(t.employees
            .get(&id)
            .map(|e| WithMedia::new(e.clone(), t.media(e.avatar_id))))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .lock()
            .employees
            .values()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Employee>>, RepositoryError> {
        let t = self.lock();
        let rows = t
            .employees
            .values()
            .map(|e| (e.created_at, e.id, WithMedia::new(e.clone(), t.media(e.avatar_id))))
            .collect();
        Ok(params.apply(rows))
    }

    async fn update(
        &self,
        id: i32,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Employees)?;
        let now = t.now();
        let Some(employee) = t.employees.get_mut(&id) else {
            return Ok(None);
        };
        employee.name = changes.name;
        employee.email = changes.email;
        employee.phone = changes.phone;
        employee.role = changes.role;
        employee.updated_at = now;
        Ok(Some(employee.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut t = self.lock();
        t.check(Table::Employees)?;
        t.posts.retain(|_, p| p.employee_id != id);
        Ok(t.employees.remove(&id).is_some())
    }
}
